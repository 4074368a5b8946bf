//! Spatial placement - grounded, spaced random sampling inside a volume.
//!
//! Algorithm: "sample, ground, test, relax"
//! 1. Sample a uniform point in the bounds footprint (shrunk by spread/padding)
//! 2. Probe straight down for ground; a miss snaps to the default floor
//! 3. Accept if planar distance to every occupied point is >= spacing
//!    (and, for filtered placement, the clearance and exclusion tests pass)
//! 4. After a full round of failed attempts, multiply spacing by the
//!    relaxation factor and try again
//! 5. When every round fails, `place` falls back to an unconstrained grounded
//!    sample. Spacing is soft: a pass is never blocked by one bad sample.
//!
//! The first valid candidate wins; there is no ranking among valid ones.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::placement as defaults;
use crate::geometry::{Bounds, Capsule, Clearance, Vec3};

/// Scene geometry queries used to ground and clear candidates.
pub trait GroundProbe {
    /// Cast straight down from `(x, from_y, z)` for at most `max_drop` units.
    /// Returns the height of the first supporting surface hit.
    fn query_ground_height(&self, x: f32, z: f32, from_y: f32, max_drop: f32) -> Option<f32>;

    /// Whether the capsule overlaps a structure.
    fn is_volume_blocked(&self, _capsule: &Capsule) -> bool {
        false
    }
}

/// Infinite horizontal plane at `height`, nothing blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundProbe for FlatGround {
    fn query_ground_height(&self, _x: f32, _z: f32, from_y: f32, max_drop: f32) -> Option<f32> {
        let drop = from_y - self.height;
        (drop >= 0.0 && drop <= max_drop).then_some(self.height)
    }
}

/// Sampling and spacing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Starting minimum planar distance between placed entities.
    pub min_spacing: f32,
    /// Spacing multiplier applied after a failed round (0..1).
    pub relaxation_factor: f32,
    /// Rounds in total, the first at full spacing.
    pub relaxation_rounds: u32,
    pub attempts_per_round: u32,
    /// Fraction of the usable half-span kept free along each edge.
    pub edge_padding: f32,
    /// Fraction of the half-extents used for sampling.
    pub spread: f32,
    /// Height above the sample the ground probe starts from.
    pub probe_height: f32,
    /// Distance below the sample the probe still searches.
    pub probe_distance: f32,
    /// Height used when the probe hits nothing.
    pub default_floor: f32,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            min_spacing: defaults::MIN_SPACING,
            relaxation_factor: defaults::RELAXATION_FACTOR,
            relaxation_rounds: defaults::RELAXATION_ROUNDS,
            attempts_per_round: defaults::ATTEMPTS_PER_ROUND,
            edge_padding: defaults::EDGE_PADDING,
            spread: defaults::SPREAD,
            probe_height: defaults::PROBE_HEIGHT,
            probe_distance: defaults::PROBE_DISTANCE,
            default_floor: defaults::DEFAULT_FLOOR,
        }
    }
}

impl PlacementSettings {
    /// Clamp every field into its usable range.
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let factor = finite_or(self.relaxation_factor, defaults::RELAXATION_FACTOR);
        Self {
            min_spacing: finite_or(self.min_spacing, 0.0).max(0.0),
            relaxation_factor: if factor > 0.0 && factor < 1.0 {
                factor
            } else {
                defaults::RELAXATION_FACTOR
            },
            relaxation_rounds: self.relaxation_rounds.max(1),
            attempts_per_round: self.attempts_per_round.max(1),
            edge_padding: finite_or(self.edge_padding, 0.0).clamp(0.0, 1.0),
            spread: finite_or(self.spread, 1.0).clamp(0.1, 1.0),
            probe_height: finite_or(self.probe_height, 0.0).max(0.0),
            probe_distance: finite_or(self.probe_distance, 0.0).max(0.0),
            default_floor: finite_or(self.default_floor, 0.0),
        }
    }
}

/// Keep-out disc around a dynamic actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exclusion {
    pub center: Vec3,
    pub radius: f32,
}

/// Extra predicates for the filtered overload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementFilter {
    /// Capsule tested against [`GroundProbe::is_volume_blocked`].
    pub clearance: Option<Clearance>,
    pub exclusion: Option<Exclusion>,
}

impl PlacementFilter {
    fn accepts<G: GroundProbe + ?Sized>(&self, candidate: &Vec3, ground: &G) -> bool {
        if let Some(exclusion) = self.exclusion {
            if exclusion.radius > 0.0
                && candidate.planar_distance_squared(&exclusion.center)
                    < exclusion.radius * exclusion.radius
            {
                return false;
            }
        }
        if let Some(clearance) = self.clearance {
            if ground.is_volume_blocked(&Capsule::standing_at(*candidate, clearance)) {
                return false;
            }
        }
        true
    }
}

/// A candidate that satisfied spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacedPlacement {
    pub position: Vec3,
    /// Spacing in force when the candidate was accepted.
    pub spacing: f32,
    /// Number of relaxations applied before acceptance.
    pub relaxations: u32,
}

/// Outcome of [`SpatialPlacement::place`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Spaced(SpacedPlacement),
    /// Every round failed; position may overlap existing entities.
    Unconstrained(Vec3),
}

impl Placement {
    pub fn position(&self) -> Vec3 {
        match self {
            Placement::Spaced(p) => p.position,
            Placement::Unconstrained(p) => *p,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Placement::Unconstrained(_))
    }

    pub fn was_relaxed(&self) -> bool {
        matches!(self, Placement::Spaced(p) if p.relaxations > 0)
    }
}

/// Stateless placement algorithm configured by [`PlacementSettings`].
#[derive(Debug, Clone, Default)]
pub struct SpatialPlacement {
    settings: PlacementSettings,
}

impl SpatialPlacement {
    pub fn new(settings: PlacementSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    /// Uniform point in the padded footprint, at the bounds' center height.
    pub fn sample_point<R: Rng + ?Sized>(&self, bounds: &Bounds, rng: &mut R) -> Vec3 {
        let half = bounds.half_extents();
        let span_x = half.x.abs() * self.settings.spread;
        let span_z = half.z.abs() * self.settings.spread;
        let pad_x = span_x * self.settings.edge_padding;
        let pad_z = span_z * self.settings.edge_padding;

        let x = uniform(rng, -span_x + pad_x, span_x - pad_x);
        let z = uniform(rng, -span_z + pad_z, span_z - pad_z);
        Vec3::new(bounds.center.x + x, bounds.center.y, bounds.center.z + z)
    }

    /// Snap a point onto the nearest surface below, or the default floor.
    pub fn project_to_ground<G: GroundProbe + ?Sized>(&self, point: Vec3, ground: &G) -> Vec3 {
        let from_y = point.y + self.settings.probe_height;
        let max_drop = self.settings.probe_height + self.settings.probe_distance;
        match ground.query_ground_height(point.x, point.z, from_y, max_drop) {
            Some(height) => point.with_y(height),
            None => point.with_y(self.settings.default_floor),
        }
    }

    /// Grounded sample with no spacing constraint.
    pub fn unconstrained_sample<G: GroundProbe + ?Sized, R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        ground: &G,
        rng: &mut R,
    ) -> Vec3 {
        self.project_to_ground(self.sample_point(bounds, rng), ground)
    }

    /// Search for a spaced, grounded position. `None` once every round fails.
    pub fn try_place<G: GroundProbe + ?Sized, R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        occupied: &[Vec3],
        ground: &G,
        rng: &mut R,
    ) -> Option<SpacedPlacement> {
        self.try_place_filtered(bounds, occupied, ground, &PlacementFilter::default(), rng)
    }

    /// [`try_place`](Self::try_place) that also applies `filter`.
    pub fn try_place_filtered<G: GroundProbe + ?Sized, R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        occupied: &[Vec3],
        ground: &G,
        filter: &PlacementFilter,
        rng: &mut R,
    ) -> Option<SpacedPlacement> {
        let mut spacing = self.settings.min_spacing;
        for relaxations in 0..self.settings.relaxation_rounds {
            for _ in 0..self.settings.attempts_per_round {
                let candidate = self.unconstrained_sample(bounds, ground, rng);
                if is_far_enough(&candidate, occupied, spacing) && filter.accepts(&candidate, ground)
                {
                    return Some(SpacedPlacement {
                        position: candidate,
                        spacing,
                        relaxations,
                    });
                }
            }
            spacing *= self.settings.relaxation_factor;
        }
        None
    }

    /// Best-effort placement; the result is appended to `occupied`.
    pub fn place<G: GroundProbe + ?Sized, R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        occupied: &mut Vec<Vec3>,
        ground: &G,
        rng: &mut R,
    ) -> Placement {
        self.place_filtered(bounds, occupied, ground, &PlacementFilter::default(), rng)
    }

    /// Best-effort filtered placement; the result is appended to `occupied`.
    pub fn place_filtered<G: GroundProbe + ?Sized, R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        occupied: &mut Vec<Vec3>,
        ground: &G,
        filter: &PlacementFilter,
        rng: &mut R,
    ) -> Placement {
        let placement = match self.try_place_filtered(bounds, occupied, ground, filter, rng) {
            Some(spaced) => Placement::Spaced(spaced),
            None => {
                log::warn!(
                    "No spaced position after {} rounds ({} occupied); accepting overlap",
                    self.settings.relaxation_rounds,
                    occupied.len()
                );
                Placement::Unconstrained(self.unconstrained_sample(bounds, ground, rng))
            }
        };
        occupied.push(placement.position());
        placement
    }
}

/// Planar spacing test against every occupied point.
pub fn is_far_enough(candidate: &Vec3, occupied: &[Vec3], spacing: f32) -> bool {
    if spacing <= 0.0 || occupied.is_empty() {
        return true;
    }
    let min_sq = spacing * spacing;
    occupied
        .iter()
        .all(|p| p.planar_distance_squared(candidate) >= min_sq)
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        (min + max) * 0.5
    }
}
