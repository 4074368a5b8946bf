//! Elimination judging and the impostor tally.
//!
//! A hit is correct only when the target's current colour is the round's
//! impostor colour. Shape and the `is_impostor` flag are never consulted,
//! so a civilian recoloured into the impostor colour is a fair hit and an
//! impostor caught between rotations is not.

use hecs::{Entity, World};
use impostor_logic::round_state::RoundState;
use serde::{Deserialize, Serialize};

use super::spawning::EntityRegistry;
use crate::components::Identity;

/// Outcome of a single elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// Counts impostors for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpostorTally {
    pub total_spawned: u32,
    pub eliminated: u32,
    pub remaining: u32,
    cleared_reported: bool,
}

impl ImpostorTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) {
        self.total_spawned += 1;
        self.remaining += 1;
        self.cleared_reported = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a correct hit. Returns `true` exactly once, on the hit that
    /// clears the round.
    pub fn record_impostor_eliminated(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.eliminated += 1;
        self.remaining -= 1;
        if self.remaining == 0 && !self.cleared_reported {
            self.cleared_reported = true;
            log::info!("All {} impostors eliminated", self.total_spawned);
            return true;
        }
        false
    }

    pub fn is_cleared(&self) -> bool {
        self.total_spawned > 0 && self.remaining == 0
    }
}

/// Judge a hit on `entity` without touching the world.
pub fn judge_hit(world: &World, round: &RoundState, entity: Entity) -> Verdict {
    match world.get::<&Identity>(entity) {
        Ok(identity) if round.is_impostor_color(identity.color_id) => Verdict::Correct,
        _ => Verdict::Wrong,
    }
}

/// Judge, despawn and tally a hit on a registered NPC. `None` when the
/// entity is gone or is not one of the round's NPCs, such as the player.
pub fn eliminate(
    world: &mut World,
    round: &RoundState,
    registry: &mut EntityRegistry,
    tally: &mut ImpostorTally,
    entity: Entity,
) -> Option<Verdict> {
    if !world.contains(entity) {
        return None;
    }
    if !registry.contains(entity) {
        log::debug!("Ignoring hit on unregistered entity {:?}", entity);
        return None;
    }

    let verdict = judge_hit(world, round, entity);
    let _ = world.despawn(entity);
    registry.remove(entity);

    match verdict {
        Verdict::Correct => {
            tally.record_impostor_eliminated();
        }
        Verdict::Wrong => log::debug!("Wrong target {:?}", entity),
    }
    Some(verdict)
}
