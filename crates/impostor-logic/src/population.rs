//! Population sizing - how many civilians and impostors a round gets.
//!
//! Counts scale with the planar area of the movement bounds so large arenas
//! feel full and small ones stay readable. Both resolvers are pure and
//! non-decreasing in area until the clamp ceiling.

use serde::{Deserialize, Serialize};

use crate::constants::population as defaults;

/// Density and clamp rules for population sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityRules {
    /// Civilians per 100 square units of footprint.
    pub civilians_per_hundred: f32,
    /// Impostors per 100 square units of footprint.
    pub impostors_per_hundred: f32,
    /// Inclusive clamp for civilian counts.
    pub civilian_range: (u32, u32),
    /// Inclusive clamp for impostor counts.
    pub impostor_range: (u32, u32),
    /// Scales the configured base civilian count.
    pub civilian_count_multiplier: f32,
    /// Boosts the density-derived civilian count.
    pub civilian_density_multiplier: f32,
    /// Impostor minimum in strict (focus) scenes.
    pub strict_impostor_floor: u32,
}

impl Default for DensityRules {
    fn default() -> Self {
        Self {
            civilians_per_hundred: defaults::CIVILIANS_PER_HUNDRED,
            impostors_per_hundred: defaults::IMPOSTORS_PER_HUNDRED,
            civilian_range: defaults::CIVILIAN_RANGE,
            impostor_range: defaults::IMPOSTOR_RANGE,
            civilian_count_multiplier: defaults::CIVILIAN_COUNT_MULTIPLIER,
            civilian_density_multiplier: defaults::CIVILIAN_DENSITY_MULTIPLIER,
            strict_impostor_floor: defaults::STRICT_IMPOSTOR_FLOOR,
        }
    }
}

/// Civilian count for a round.
///
/// `max(round(base × count_multiplier), round(area/100 × density × density_multiplier))`
/// clamped to `civilian_range`.
pub fn resolve_civilian_count(base: u32, area: f32, rules: &DensityRules) -> u32 {
    let baseline = scaled(base as f32, non_negative(rules.civilian_count_multiplier));
    let density = per_hundred(area, rules.civilians_per_hundred)
        * non_negative(rules.civilian_density_multiplier);
    let resolved = baseline.max(round_count(density));
    clamp_to(resolved, rules.civilian_range)
}

/// Impostor count for a round.
///
/// `max(base, round(area/100 × density))`, floored at `strict_impostor_floor`
/// when `strict`, then clamped to `impostor_range`.
pub fn resolve_impostor_count(base: u32, area: f32, strict: bool, rules: &DensityRules) -> u32 {
    let density = round_count(per_hundred(area, rules.impostors_per_hundred));
    let mut resolved = base.max(density);
    if strict {
        resolved = resolved.max(rules.strict_impostor_floor);
    }
    clamp_to(resolved, rules.impostor_range)
}

fn per_hundred(area: f32, rate: f32) -> f32 {
    let area = if area.is_finite() { area.abs() } else { 0.0 };
    area / 100.0 * non_negative(rate)
}

fn scaled(value: f32, factor: f32) -> u32 {
    round_count(value * factor)
}

fn round_count(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f32) as u32
    } else {
        0
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn clamp_to(value: u32, (a, b): (u32, u32)) -> u32 {
    value.clamp(a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_area_civilians_hit_floor() {
        let rules = DensityRules::default();
        // 30 × 1.45 = 43.5 → 44, clamped up to 45.
        assert_eq!(resolve_civilian_count(30, 0.0, &rules), 45);
    }

    #[test]
    fn test_huge_area_civilians_hit_ceiling() {
        let rules = DensityRules::default();
        assert_eq!(resolve_civilian_count(30, 100_000.0, &rules), 140);
    }

    #[test]
    fn test_density_beats_baseline_mid_range() {
        let rules = DensityRules::default();
        // 6000 / 100 × 1.15 × 1.2 = 82.8 → 83
        assert_eq!(resolve_civilian_count(30, 6_000.0, &rules), 83);
    }

    #[test]
    fn test_baseline_beats_density_for_small_area() {
        let rules = DensityRules::default();
        // 50 × 1.45 = 72.5 → 73 (rounds half away from zero)
        assert_eq!(resolve_civilian_count(50, 100.0, &rules), 73);
    }

    #[test]
    fn test_impostor_count_defaults() {
        let rules = DensityRules::default();
        assert_eq!(resolve_impostor_count(4, 0.0, false, &rules), 4);
        // 3000 / 100 × 0.2 = 6
        assert_eq!(resolve_impostor_count(4, 3_000.0, false, &rules), 6);
        assert_eq!(resolve_impostor_count(4, 1_000_000.0, false, &rules), 14);
    }

    #[test]
    fn test_strict_scene_floor() {
        let rules = DensityRules::default();
        assert_eq!(resolve_impostor_count(4, 0.0, true, &rules), 10);
        assert_eq!(resolve_impostor_count(12, 0.0, true, &rules), 12);
    }

    #[test]
    fn test_zero_base_clamps_to_minimum() {
        let rules = DensityRules::default();
        assert_eq!(resolve_impostor_count(0, 0.0, false, &rules), 4);
        assert_eq!(resolve_civilian_count(0, 0.0, &rules), 45);
    }

    #[test]
    fn test_negative_and_nan_area() {
        let rules = DensityRules::default();
        assert_eq!(
            resolve_civilian_count(30, -6_000.0, &rules),
            resolve_civilian_count(30, 6_000.0, &rules)
        );
        assert_eq!(resolve_civilian_count(30, f32::NAN, &rules), 45);
    }

    #[test]
    fn test_inverted_range_is_normalised() {
        let rules = DensityRules {
            impostor_range: (14, 4),
            ..Default::default()
        };
        assert_eq!(resolve_impostor_count(1, 0.0, false, &rules), 4);
        assert_eq!(resolve_impostor_count(99, 0.0, false, &rules), 14);
    }

    #[test]
    fn test_monotonic_in_area() {
        let rules = DensityRules::default();
        let mut prev_civ = 0;
        let mut prev_imp = 0;
        let mut prev_strict = 0;
        for step in 0..400 {
            let area = step as f32 * 50.0;
            let civ = resolve_civilian_count(30, area, &rules);
            let imp = resolve_impostor_count(4, area, false, &rules);
            let strict = resolve_impostor_count(4, area, true, &rules);
            assert!(civ >= prev_civ, "civilians dropped at area {area}");
            assert!(imp >= prev_imp, "impostors dropped at area {area}");
            assert!(strict >= prev_strict, "strict impostors dropped at area {area}");
            prev_civ = civ;
            prev_imp = imp;
            prev_strict = strict;
        }
    }
}
