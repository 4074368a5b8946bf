//! NPC components: Npc marker, Identity, PathFollower.

use impostor_logic::palette::ColorId;
use impostor_logic::paths::{PathTemplate, ShapeType};
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a civilian or impostor
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Npc;

/// Role, shape and current colour of an NPC.
///
/// Colour cycling rewrites `color_id` in place; `is_impostor` never changes
/// after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub is_impostor: bool,
    pub shape: ShapeType,
    pub color_id: ColorId,
}

impl Identity {
    pub fn civilian(shape: ShapeType, color_id: ColorId) -> Self {
        Self {
            is_impostor: false,
            shape,
            color_id,
        }
    }

    pub fn impostor(shape: ShapeType, color_id: ColorId) -> Self {
        Self {
            is_impostor: true,
            shape,
            color_id,
        }
    }

    pub fn role(&self) -> Role {
        if self.is_impostor {
            Role::Impostor
        } else {
            Role::Civilian
        }
    }
}

/// Which registry an NPC belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Civilian,
    Impostor,
}

/// Patrol loop consumed by the movement collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFollower {
    pub template: PathTemplate,
}

impl PathFollower {
    pub fn new(template: PathTemplate) -> Self {
        Self { template }
    }
}
