//! Spawning system - populates a round with civilians and impostors.
//!
//! One pass runs in a fixed order: player anchor, civilians, impostors.
//! Every NPC gets a grounded, spaced position, a random shape, a colour and
//! its own patrol loop. Entity handles are kept in an [`EntityRegistry`] so
//! the colour cycle can find them again.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;

use impostor_logic::config::{SceneProfile, SpawnConfig};
use impostor_logic::constants::keywords;
use impostor_logic::geometry::{Bounds, Vec3};
use impostor_logic::palette::{ColorId, Palette};
use impostor_logic::paths::{build_path_template, ShapeType};
use impostor_logic::placement::{Exclusion, GroundProbe, Placement, PlacementFilter, SpatialPlacement};
use impostor_logic::population::{resolve_civilian_count, resolve_impostor_count};
use impostor_logic::round_state::RoundState;

use super::elimination::ImpostorTally;
use crate::collaborators::Recolor;
use crate::components::{Identity, Npc, PathFollower, Player, Role, Transform};

/// Live NPC handles, split by role.
///
/// Entries go stale when an entity is despawned elsewhere; call
/// [`prune`](Self::prune) before iterating.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    impostors: Vec<Entity>,
    civilians: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn impostors(&self) -> &[Entity] {
        &self.impostors
    }

    pub fn civilians(&self) -> &[Entity] {
        &self.civilians
    }

    pub fn len(&self) -> usize {
        self.impostors.len() + self.civilians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, role: Role, entity: Entity) {
        match role {
            Role::Impostor => self.impostors.push(entity),
            Role::Civilian => self.civilians.push(entity),
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.impostors.contains(&entity) || self.civilians.contains(&entity)
    }

    /// Forget `entity`. Returns whether it was registered.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.len();
        self.impostors.retain(|&e| e != entity);
        self.civilians.retain(|&e| e != entity);
        self.len() != before
    }

    pub fn clear(&mut self) {
        self.impostors.clear();
        self.civilians.clear();
    }

    /// Drop handles whose entity no longer exists. Returns how many went.
    pub fn prune(&mut self, world: &World) -> usize {
        let before = self.len();
        self.impostors.retain(|&e| world.contains(e));
        self.civilians.retain(|&e| world.contains(e));
        before - self.len()
    }
}

/// Read-only inputs for a spawning pass.
#[derive(Clone, Copy)]
pub struct SpawnEnv<'a> {
    pub round: &'a RoundState,
    pub scene: &'a SceneProfile,
    /// Movement bounds NPCs are placed in.
    pub bounds: Option<&'a Bounds>,
    pub ground: &'a dyn GroundProbe,
}

/// Summary of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub player: Entity,
    pub civilians: u32,
    pub impostors: u32,
    /// NPCs placed after at least one spacing relaxation.
    pub relaxed: u32,
    /// NPCs placed without any spacing guarantee.
    pub fallbacks: u32,
}

/// Reasons a spawning pass does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// No movement bounds were configured for the scene.
    MissingBounds,
}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::MissingBounds => write!(f, "No movement bounds assigned; cannot spawn NPCs"),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Owns placement state and the registries for one scene.
#[derive(Debug, Clone)]
pub struct EntityDirector {
    config: SpawnConfig,
    placement: SpatialPlacement,
    occupied: Vec<Vec3>,
    registry: EntityRegistry,
    player: Option<Entity>,
    warm_colors: Option<Vec<ColorId>>,
    focus_impostor_color: Option<ColorId>,
}

impl Default for EntityDirector {
    fn default() -> Self {
        Self::new(SpawnConfig::default())
    }
}

impl EntityDirector {
    pub fn new(config: SpawnConfig) -> Self {
        let placement = SpatialPlacement::new(config.placement);
        Self {
            config,
            placement,
            occupied: Vec::new(),
            registry: EntityRegistry::new(),
            player: None,
            warm_colors: None,
            focus_impostor_color: None,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Positions claimed during the last pass, player first.
    pub fn occupied(&self) -> &[Vec3] {
        &self.occupied
    }

    /// Populate `world` for a new round.
    ///
    /// NPCs from a previous pass are despawned first. The player entity is
    /// reused and moved when one exists.
    pub fn start_spawning_pass<R: Rng + ?Sized>(
        &mut self,
        env: SpawnEnv<'_>,
        world: &mut World,
        recolor: &mut dyn Recolor,
        tally: &mut ImpostorTally,
        rng: &mut R,
    ) -> Result<SpawnReport, SpawnError> {
        let Some(bounds) = env.bounds else {
            log::error!("{}", SpawnError::MissingBounds);
            return Err(SpawnError::MissingBounds);
        };

        self.clear_population(world);
        self.occupied.clear();
        self.warm_colors = None;
        self.focus_impostor_color = None;

        let palette = env.round.palette();
        let focus = env.scene.focus;
        let area = bounds.planar_area();

        let player = self.place_player(world);

        let mut report = SpawnReport {
            player,
            civilians: 0,
            impostors: 0,
            relaxed: 0,
            fallbacks: 0,
        };

        let filter = PlacementFilter {
            clearance: self.config.npc_clearance,
            exclusion: Some(Exclusion {
                center: self.player_position(world),
                radius: self.config.player_exclusion_radius,
            }),
        };

        let civilian_count = resolve_civilian_count(self.config.civilian_count, area, &self.config.density);
        for _ in 0..civilian_count {
            let shape = ShapeType::random(rng);
            let color_id = self.civilian_color(palette, focus, rng);
            let placement = self.spawn_npc(
                world,
                recolor,
                bounds,
                env.ground,
                &filter,
                Identity::civilian(shape, color_id),
                rng,
            );
            report.civilians += 1;
            count_placement(&mut report, &placement);
        }

        let pairs = env.round.allowed_pairs();
        if pairs.is_empty() {
            log::warn!("No clue pairs set for this round; skipping impostors");
        } else {
            let impostor_count =
                resolve_impostor_count(self.config.impostor_count, area, focus, &self.config.density);
            for _ in 0..impostor_count {
                let Some(pair) = pairs.choose(rng).copied() else {
                    break;
                };
                let color_id = if focus {
                    self.focus_impostor_color(palette)
                } else {
                    pair.color_id
                };
                let placement = self.spawn_npc(
                    world,
                    recolor,
                    bounds,
                    env.ground,
                    &filter,
                    Identity::impostor(pair.shape, color_id),
                    rng,
                );
                tally.register();
                report.impostors += 1;
                count_placement(&mut report, &placement);
            }
        }

        log::info!(
            "Spawned {} civilians and {} impostors in {} (area {:.1}, {} relaxed, {} unspaced)",
            report.civilians,
            report.impostors,
            env.scene.name,
            area,
            report.relaxed,
            report.fallbacks
        );
        Ok(report)
    }

    /// Despawn every registered NPC and empty the registries.
    pub fn clear_population(&mut self, world: &mut World) {
        for entity in self.registry.impostors.drain(..).chain(self.registry.civilians.drain(..)) {
            let _ = world.despawn(entity);
        }
    }

    fn place_player(&mut self, world: &mut World) -> Entity {
        let position = self.config.player_spawn.with_y(0.0);

        let mut existing = self.player.filter(|&e| world.get::<&Player>(e).is_ok());
        if existing.is_none() {
            existing = world.query::<&Player>().iter().next().map(|(e, _)| e);
        }

        let player = match existing {
            Some(entity) => {
                let moved = match world.get::<&mut Transform>(entity) {
                    Ok(mut transform) => {
                        transform.position = position;
                        true
                    }
                    Err(_) => false,
                };
                if !moved {
                    let _ = world.insert_one(entity, Transform::at(position));
                }
                log::debug!("Reusing player {:?}", entity);
                entity
            }
            None => world.spawn((Player, Transform::at(position))),
        };

        self.player = Some(player);
        self.occupied.push(position);
        player
    }

    fn player_position(&self, world: &World) -> Vec3 {
        self.player
            .and_then(|e| world.get::<&Transform>(e).ok().map(|t| t.position))
            .unwrap_or_else(|| self.config.player_spawn.with_y(0.0))
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_npc<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        recolor: &mut dyn Recolor,
        bounds: &Bounds,
        ground: &dyn GroundProbe,
        filter: &PlacementFilter,
        identity: Identity,
        rng: &mut R,
    ) -> Placement {
        let placement = self
            .placement
            .place_filtered(bounds, &mut self.occupied, ground, filter, rng);
        let position = placement.position();
        let template = build_path_template(identity.shape, position, &self.config.paths, rng);
        let yaw_deg = template.rotation_deg;

        let entity = world.spawn((
            Npc,
            Transform { position, yaw_deg },
            identity,
            PathFollower::new(template),
        ));
        self.registry.insert(identity.role(), entity);
        recolor.apply_color(entity, identity.color_id, identity.is_impostor);
        entity_placed_debug(entity, &identity, position);
        placement
    }

    /// Civilian colour: warm shades in focus scenes, anything otherwise.
    fn civilian_color<R: Rng + ?Sized>(&mut self, palette: &Palette, focus: bool, rng: &mut R) -> ColorId {
        if palette.is_empty() {
            return 0;
        }
        if focus {
            let warm = self
                .warm_colors
                .get_or_insert_with(|| palette.ids_matching_any(&keywords::FOCUS_WARM));
            if let Some(&id) = warm.choose(rng) {
                return id;
            }
        }
        rng.gen_range(0..palette.len() as ColorId)
    }

    /// First red palette entry, else 0. Cached for the pass.
    fn focus_impostor_color(&mut self, palette: &Palette) -> ColorId {
        *self
            .focus_impostor_color
            .get_or_insert_with(|| palette.find_by_keyword(keywords::IMPOSTOR).unwrap_or(0))
    }
}

fn count_placement(report: &mut SpawnReport, placement: &Placement) {
    if placement.is_fallback() {
        report.fallbacks += 1;
    } else if placement.was_relaxed() {
        report.relaxed += 1;
    }
}

fn entity_placed_debug(entity: Entity, identity: &Identity, position: Vec3) {
    log::debug!(
        "{:?} {:?} {} color {} at ({:.2}, {:.2}, {:.2})",
        identity.role(),
        entity,
        identity.shape,
        identity.color_id,
        position.x,
        position.y,
        position.z
    );
}
