//! Colour cycle system - rotates the impostor colour on a timer.
//!
//! The coordinator is an explicit timer driven by [`ColorCycleCoordinator::advance`].
//! Each tick moves the impostor colour one step along the cycle sequence,
//! repaints every live impostor, tells the player, and then re-spreads the
//! civilians over the remaining cycle colours so the crowd keeps providing
//! cover.

use std::time::Duration;

use hecs::{Entity, World};
use rand::Rng;

use impostor_logic::constants::{cycle, keywords};
use impostor_logic::cycle::{build_cycle_sequence, decoy_color_pool, round_robin};
use impostor_logic::palette::{ColorId, Palette};
use impostor_logic::round_state::RoundState;

use super::spawning::EntityRegistry;
use crate::collaborators::{ColorAnnouncer, Recolor};
use crate::components::Identity;

/// Everything a cycle step mutates.
pub struct CycleTargets<'a> {
    pub world: &'a mut World,
    pub registry: &'a mut EntityRegistry,
    pub palette: &'a Palette,
    pub round: &'a mut RoundState,
    pub recolor: &'a mut dyn Recolor,
    pub announcer: &'a mut dyn ColorAnnouncer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    Idle,
    Running { interval: Duration, elapsed: Duration },
}

/// Timer-driven camouflage rotation.
#[derive(Debug, Clone)]
pub struct ColorCycleCoordinator {
    state: CycleState,
    sequence: Vec<ColorId>,
    index: usize,
}

impl Default for ColorCycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCycleCoordinator {
    pub fn new() -> Self {
        Self {
            state: CycleState::Idle,
            sequence: Vec::new(),
            index: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CycleState::Running { .. })
    }

    /// Tick interval while running.
    pub fn interval(&self) -> Option<Duration> {
        match self.state {
            CycleState::Running { interval, .. } => Some(interval),
            CycleState::Idle => None,
        }
    }

    pub fn sequence(&self) -> &[ColorId] {
        &self.sequence
    }

    /// Impostor colour last applied by the cycle.
    pub fn current_color(&self) -> Option<ColorId> {
        self.sequence.get(self.index).copied()
    }

    /// Start cycling, replacing any running cycle.
    ///
    /// The first colour is applied at once and silently. With a single
    /// colour nothing is scheduled. Returns whether a timer is running.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        interval: Duration,
        targets: &mut CycleTargets<'_>,
        rng: &mut R,
    ) -> bool {
        self.stop();
        self.sequence.clear();
        self.index = 0;

        if targets.palette.is_empty() {
            log::warn!("Color palette is empty; color cycling disabled");
            return false;
        }

        self.sequence = build_cycle_sequence(targets.palette, &keywords::COLOR_CYCLE);
        let Some(&first) = self.sequence.first() else {
            return false;
        };

        self.apply_impostor_color(first, targets, false);
        self.redistribute_decoys(first, targets, rng);

        if self.sequence.len() < 2 {
            log::info!("Color cycle has a single color; no rotation scheduled");
            return false;
        }

        let min = Duration::from_millis(cycle::MIN_INTERVAL_MS);
        let interval = interval.max(min);
        self.state = CycleState::Running {
            interval,
            elapsed: Duration::ZERO,
        };
        log::info!(
            "Color cycle started: {} colors every {:.1}s",
            self.sequence.len(),
            interval.as_secs_f32()
        );
        true
    }

    /// Stop the timer. The current override stays in place.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("Color cycle stopped");
        }
        self.state = CycleState::Idle;
    }

    /// Feed unscaled frame time. Fires at most one tick per call and
    /// returns whether it did.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        targets: &mut CycleTargets<'_>,
        rng: &mut R,
    ) -> bool {
        let CycleState::Running { interval, elapsed } = self.state else {
            return false;
        };

        let elapsed = elapsed.saturating_add(dt);
        if elapsed < interval {
            self.state = CycleState::Running { interval, elapsed };
            return false;
        }

        // Carry the overshoot, but never enough for a second tick.
        let rest = elapsed - interval;
        let elapsed = if rest < interval { rest } else { Duration::ZERO };
        self.state = CycleState::Running { interval, elapsed };
        self.tick(targets, rng);
        true
    }

    /// Move to the next colour immediately.
    pub fn tick<R: Rng + ?Sized>(&mut self, targets: &mut CycleTargets<'_>, rng: &mut R) {
        if self.sequence.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.sequence.len();
        let color = self.sequence[self.index];

        self.apply_impostor_color(color, targets, true);
        self.redistribute_decoys(color, targets, rng);
    }

    fn apply_impostor_color(&self, color: ColorId, targets: &mut CycleTargets<'_>, announce: bool) {
        let pruned = targets.registry.prune(targets.world);
        if pruned > 0 {
            log::debug!("Pruned {} despawned entities before recolor", pruned);
        }

        targets.round.set_impostor_color_override(color);

        for &entity in targets.registry.impostors() {
            if recolor_entity(targets.world, entity, color) {
                targets.recolor.apply_color(entity, color, true);
            }
        }

        targets.announcer.set_indicator_color(color);
        targets.announcer.show_indicator();

        if announce {
            let name = if targets.palette.contains(color) {
                targets.palette.name(color)
            } else {
                ""
            };
            let name = if name.is_empty() { cycle::UNNAMED_COLOR } else { name };
            targets.announcer.announce_color_change(name);
            log::debug!("Impostor color -> {} ({})", color, name);
        }
    }

    fn redistribute_decoys<R: Rng + ?Sized>(
        &self,
        impostor_color: ColorId,
        targets: &mut CycleTargets<'_>,
        rng: &mut R,
    ) {
        targets.registry.prune(targets.world);
        let civilians = targets.registry.civilians();
        if civilians.is_empty() {
            return;
        }

        let pool = decoy_color_pool(&self.sequence, targets.palette.len(), impostor_color);
        if pool.is_empty() {
            return;
        }

        let offset = rng.gen_range(0..pool.len());
        let colors = round_robin(&pool, civilians.len(), offset);
        for (&entity, &color) in civilians.iter().zip(colors.iter()) {
            if recolor_entity(targets.world, entity, color) {
                targets.recolor.apply_color(entity, color, false);
            }
        }
    }
}

fn recolor_entity(world: &World, entity: Entity, color: ColorId) -> bool {
    match world.get::<&mut Identity>(entity) {
        Ok(mut identity) => {
            identity.color_id = color;
            true
        }
        Err(_) => false,
    }
}
