//! Spawn and scene configuration.
//!
//! Every struct here deserialises from JSON with missing fields filled from
//! `Default`, which carries the shipped tuning. `validate_spawn_config`
//! reports problems without rejecting anything: the spawner clamps bad
//! values at use.

use serde::{Deserialize, Serialize};

use crate::constants::{placement, population, scenes};
use crate::geometry::{Clearance, Vec3};
use crate::palette::Palette;
use crate::paths::PathSettings;
use crate::placement::PlacementSettings;
use crate::population::DensityRules;

/// Per-scene rules the director and coordinator read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneProfile {
    pub name: String,
    /// Narrow colour rules: warm-only civilians, red impostors, more impostors.
    #[serde(default)]
    pub focus: bool,
    /// Render through the red-shade filter (`Palette::color_for_role`).
    /// Independent of `focus`: only the first level shades.
    #[serde(default)]
    pub shade_filter: bool,
    /// Seconds between camouflage rotations; `None` disables cycling.
    #[serde(default)]
    pub color_shift_seconds: Option<f32>,
}

impl SceneProfile {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            focus: false,
            shade_filter: false,
            color_shift_seconds: None,
        }
    }

    /// Profile for one of the shipped levels; unknown names are plain.
    pub fn builtin(name: &str) -> Self {
        let focus = scenes::FOCUS.contains(&name);
        let shade_filter = scenes::SHADE_FILTER.contains(&name);
        let color_shift_seconds = match name {
            scenes::LEVEL_TWO => Some(scenes::LEVEL_TWO_SHIFT_SECONDS),
            scenes::LEVEL_THREE => Some(scenes::LEVEL_THREE_SHIFT_SECONDS),
            _ => None,
        };
        Self {
            name: name.to_string(),
            focus,
            shade_filter,
            color_shift_seconds,
        }
    }

    pub fn requires_color_cycle(&self) -> bool {
        self.color_shift_seconds.is_some()
    }
}

/// Parse a JSON array of scene profiles.
pub fn scene_table_from_json(json: &str) -> Result<Vec<SceneProfile>, ConfigError> {
    let scenes: Vec<SceneProfile> = serde_json::from_str(json)?;
    Ok(scenes)
}

/// Everything the director needs besides the scene and the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Base civilian count before scaling and density.
    pub civilian_count: u32,
    /// Base impostor count before density.
    pub impostor_count: u32,
    pub density: DensityRules,
    pub placement: PlacementSettings,
    pub paths: PathSettings,
    /// Player anchor position; height is forced to ground zero.
    pub player_spawn: Vec3,
    /// NPCs never spawn closer than this to the player.
    pub player_exclusion_radius: f32,
    /// Free capsule required at NPC spawn points, if any.
    pub npc_clearance: Option<Clearance>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            civilian_count: population::BASE_CIVILIANS,
            impostor_count: population::BASE_IMPOSTORS,
            density: DensityRules::default(),
            placement: PlacementSettings::default(),
            paths: PathSettings::default(),
            player_spawn: Vec3::ZERO,
            player_exclusion_radius: placement::PLAYER_EXCLUSION_RADIUS,
            npc_clearance: Some(Clearance::default()),
        }
    }
}

impl SpawnConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SpawnConfig = serde_json::from_str(json)?;
        Ok(config)
    }
}

/// Configuration problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON could not be parsed.
    Parse(String),
    /// Palette has no entries.
    EmptyPalette,
    /// Starting spacing is negative or not finite.
    InvalidSpacing(f32),
    /// Relaxation factor outside (0, 1).
    InvalidRelaxationFactor(f32),
    /// A clamp range has min > max.
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    /// Colour shift interval is not a positive number of seconds.
    InvalidShiftInterval(f32),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EmptyPalette => write!(f, "Palette has no entries"),
            ConfigError::InvalidSpacing(s) => write!(f, "Invalid spawn spacing: {}", s),
            ConfigError::InvalidRelaxationFactor(v) => {
                write!(f, "Relaxation factor must be in (0, 1), got {}", v)
            }
            ConfigError::InvertedRange { field, min, max } => {
                write!(f, "Range {} is inverted: {} > {}", field, min, max)
            }
            ConfigError::InvalidShiftInterval(s) => {
                write!(f, "Color shift interval must be positive, got {}", s)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a spawn configuration, returning all errors found.
pub fn validate_spawn_config(config: &SpawnConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let spacing = config.placement.min_spacing;
    if !spacing.is_finite() || spacing < 0.0 {
        errors.push(ConfigError::InvalidSpacing(spacing));
    }

    let factor = config.placement.relaxation_factor;
    if !(factor > 0.0 && factor < 1.0) {
        errors.push(ConfigError::InvalidRelaxationFactor(factor));
    }

    let (min, max) = config.density.civilian_range;
    if min > max {
        errors.push(ConfigError::InvertedRange {
            field: "civilian_range",
            min,
            max,
        });
    }
    let (min, max) = config.density.impostor_range;
    if min > max {
        errors.push(ConfigError::InvertedRange {
            field: "impostor_range",
            min,
            max,
        });
    }

    errors
}

/// Validate a palette. Empty palettes still run, with colour logic skipped.
pub fn validate_palette(palette: &Palette) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    if palette.is_empty() {
        errors.push(ConfigError::EmptyPalette);
    }
    errors
}

/// Validate a scene profile.
pub fn validate_scene(scene: &SceneProfile) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    if let Some(seconds) = scene.color_shift_seconds {
        if !(seconds.is_finite() && seconds > 0.0) {
            errors.push(ConfigError::InvalidShiftInterval(seconds));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_spawn_config(&SpawnConfig::default()).is_empty());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = SpawnConfig::default();
        config.placement.min_spacing = -1.0;
        config.placement.relaxation_factor = 1.0;
        config.density.civilian_range = (140, 45);
        let errors = validate_spawn_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::InvalidSpacing(-1.0)));
        assert!(errors.contains(&ConfigError::InvalidRelaxationFactor(1.0)));
    }

    #[test]
    fn test_builtin_scenes() {
        let one = SceneProfile::builtin("LvL1");
        assert!(one.focus);
        assert!(one.shade_filter);
        assert!(!one.requires_color_cycle());

        let two = SceneProfile::builtin("LvL2");
        assert!(two.focus);
        assert!(!two.shade_filter);
        assert_eq!(two.color_shift_seconds, Some(15.0));

        let three = SceneProfile::builtin("LvL3");
        assert!(!three.focus);
        assert!(three.requires_color_cycle());

        let four = SceneProfile::builtin("LvL4");
        assert_eq!(four, SceneProfile::plain("LvL4"));
    }

    #[test]
    fn test_scene_validation() {
        let mut scene = SceneProfile::builtin("LvL3");
        assert!(validate_scene(&scene).is_empty());
        scene.color_shift_seconds = Some(0.0);
        assert_eq!(validate_scene(&scene), vec![ConfigError::InvalidShiftInterval(0.0)]);
    }

    #[test]
    fn test_empty_palette_flagged() {
        assert_eq!(validate_palette(&Palette::default()), vec![ConfigError::EmptyPalette]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SpawnConfig::from_json(r#"{"civilian_count": 12, "placement": {"min_spacing": 2.0}}"#)
            .unwrap();
        assert_eq!(config.civilian_count, 12);
        assert_eq!(config.impostor_count, population::BASE_IMPOSTORS);
        assert_eq!(config.placement.min_spacing, 2.0);
        assert_eq!(config.placement.relaxation_rounds, placement::RELAXATION_ROUNDS);
    }

    #[test]
    fn test_scene_table_json() {
        let scenes = scene_table_from_json(
            r#"[{"name":"Arena","focus":true},{"name":"Carousel","color_shift_seconds":5.0}]"#,
        )
        .unwrap();
        assert_eq!(scenes.len(), 2);
        assert!(scenes[0].focus);
        assert!(!scenes[0].shade_filter);
        assert_eq!(scenes[0].color_shift_seconds, None);
        assert_eq!(scenes[1].color_shift_seconds, Some(5.0));
    }

    #[test]
    fn test_parse_error_display() {
        let err = SpawnConfig::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("Parse error"));
    }
}
