//! World-space primitives shared by placement, paths and the ECS layer.
//!
//! The play area is Y-up: X and Z span the ground plane, Y is height.
//! Spacing and avoidance checks are planar and ignore Y.

use serde::{Deserialize, Serialize};

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared distance on the ground plane (X/Z only).
    pub fn planar_distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    pub fn planar_distance(&self, other: &Self) -> f32 {
        self.planar_distance_squared(other).sqrt()
    }

    /// Same point with a different height.
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Axis-aligned movement volume (center + full size).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Footprint area of the ground plane in square units.
    ///
    /// Non-finite sizes count as an empty footprint.
    pub fn planar_area(&self) -> f32 {
        let area = (self.size.x * self.size.z).abs();
        if area.is_finite() {
            area
        } else {
            0.0
        }
    }

    /// Planar containment test; height is ignored.
    pub fn contains_planar(&self, point: &Vec3) -> bool {
        let half = self.half_extents();
        let dx = (point.x - self.center.x).abs();
        let dz = (point.z - self.center.z).abs();
        dx <= half.x.abs() && dz <= half.z.abs()
    }
}

/// Upright capsule standing on `base`, used for structure clearance tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Capsule {
    pub base: Vec3,
    pub height: f32,
    pub radius: f32,
}

impl Capsule {
    pub fn standing_at(base: Vec3, clearance: Clearance) -> Self {
        Self {
            base,
            height: clearance.height,
            radius: clearance.radius,
        }
    }

    pub fn top(&self) -> Vec3 {
        self.base.with_y(self.base.y + self.height)
    }
}

/// Capsule dimensions an entity needs free around its spawn point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Clearance {
    pub radius: f32,
    pub height: f32,
}

impl Default for Clearance {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
        }
    }
}
