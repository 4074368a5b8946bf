//! Closed patrol-path templates handed to the movement collaborator.
//!
//! Every NPC gets its own template so no two entities pace the exact same
//! loop: the center is jittered off the spawn point, the radius and yaw are
//! randomised, and the vertex count follows the shape.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::paths as defaults;
use crate::geometry::Vec3;

/// Clue / path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Triangle,
    Square,
    Pentagon,
    Circle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 4] = [
        ShapeType::Triangle,
        ShapeType::Square,
        ShapeType::Pentagon,
        ShapeType::Circle,
    ];

    /// Uniformly random shape.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Vertices along the path; circles use `circle_points`.
    pub fn vertex_count(&self, circle_points: u32) -> u32 {
        match self {
            ShapeType::Triangle => 3,
            ShapeType::Square => 4,
            ShapeType::Pentagon => 5,
            ShapeType::Circle => circle_points.max(3),
        }
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeType::Triangle => "Triangle",
            ShapeType::Square => "Square",
            ShapeType::Pentagon => "Pentagon",
            ShapeType::Circle => "Circle",
        };
        write!(f, "{}", name)
    }
}

/// Randomisation ranges for path templates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Max planar offset of the loop center from the spawn point.
    pub center_jitter: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub circle_points: u32,
    /// Fraction of the radius the follower actually paces.
    pub pace_scale: f32,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            center_jitter: defaults::CENTER_JITTER,
            radius_min: defaults::RADIUS_MIN,
            radius_max: defaults::RADIUS_MAX,
            circle_points: defaults::CIRCLE_POINTS,
            pace_scale: defaults::PACE_SCALE,
        }
    }
}

/// A closed loop the movement collaborator paces along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTemplate {
    pub shape: ShapeType,
    pub center: Vec3,
    pub radius: f32,
    /// Yaw in degrees, 0..360.
    pub rotation_deg: f32,
    /// Ordered vertices on the ground plane at the center's height.
    pub points: Vec<Vec3>,
    pub scale: f32,
    pub looped: bool,
}

impl PathTemplate {
    /// Points pulled toward the center by `scale`, as actually walked.
    pub fn scaled_points(&self) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|p| self.center + (*p - self.center) * self.scale)
            .collect()
    }
}

/// Build a fresh template for `shape` around `anchor`.
pub fn build_path_template<R: Rng + ?Sized>(
    shape: ShapeType,
    anchor: Vec3,
    settings: &PathSettings,
    rng: &mut R,
) -> PathTemplate {
    let (jx, jz) = point_in_disc(rng, settings.center_jitter.max(0.0));
    let center = Vec3::new(anchor.x + jx, anchor.y, anchor.z + jz);

    let rotation_deg = rng.gen_range(0.0..360.0f32);
    let (lo, hi) = ordered(settings.radius_min.max(0.0), settings.radius_max.max(0.0));
    let radius = if hi > lo { rng.gen_range(lo..hi) } else { lo };

    let count = shape.vertex_count(settings.circle_points);
    let step = std::f32::consts::TAU / count as f32;
    let yaw = rotation_deg.to_radians();
    let points = (0..count)
        .map(|i| {
            let angle = yaw + step * i as f32;
            Vec3::new(
                center.x + radius * angle.cos(),
                center.y,
                center.z + radius * angle.sin(),
            )
        })
        .collect();

    PathTemplate {
        shape,
        center,
        radius,
        rotation_deg,
        points,
        scale: settings.pace_scale.clamp(0.15, 1.0),
        looped: true,
    }
}

/// Uniform point inside a disc of `radius`.
fn point_in_disc<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> (f32, f32) {
    if radius <= 0.0 {
        return (0.0, 0.0);
    }
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen_range(0.0..std::f32::consts::TAU);
    (r * theta.cos(), r * theta.sin())
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
