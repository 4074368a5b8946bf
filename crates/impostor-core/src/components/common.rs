//! Components shared by every spawned entity.

use impostor_logic::geometry::Vec3;
use serde::{Deserialize, Serialize};

/// World placement of an entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Yaw in degrees
    pub yaw_deg: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw_deg: 0.0,
        }
    }
}

/// Marker component for the single player anchor
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_at() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.yaw_deg, 0.0);
    }
}
