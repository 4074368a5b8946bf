//! Component definitions for the round ECS.
//!
//! Components are pure data structs attached to entities.
//! Behaviour lives in systems and external collaborators.

mod common;
mod npc;

pub use common::*;
pub use npc::*;
