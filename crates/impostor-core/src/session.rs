//! Round session - main entry point for running a round
//!
//! A `Session` owns the ECS world and every piece of round state, and wires
//! the director, the colour cycle and hit judging to the injected
//! collaborators. Hosts drive it with `start_round`, `start_spawning_pass`
//! and a per-frame `update`.

use std::sync::Arc;
use std::time::Duration;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use impostor_logic::config::{SceneProfile, SpawnConfig};
use impostor_logic::geometry::Bounds;
use impostor_logic::palette::{ColorId, Palette};
use impostor_logic::placement::{FlatGround, GroundProbe};
use impostor_logic::round_state::{CluePair, RoundState};

use crate::collaborators::{ColorAnnouncer, NullPresenter, Recolor};
use crate::systems::*;

/// One scene's worth of round state and collaborators.
pub struct Session {
    /// ECS world containing the player and all NPCs
    world: World,
    palette: Arc<Palette>,
    round: RoundState,
    director: EntityDirector,
    coordinator: ColorCycleCoordinator,
    tally: ImpostorTally,
    scene: SceneProfile,
    /// Movement bounds; spawning is refused without them
    bounds: Option<Bounds>,
    ground: Box<dyn GroundProbe>,
    recolor: Box<dyn Recolor>,
    announcer: Box<dyn ColorAnnouncer>,
    rng: ChaCha8Rng,
}

impl Session {
    /// Session on flat ground with no-op presenters and an entropy seed.
    pub fn new(palette: Palette, scene: SceneProfile) -> Self {
        let palette = Arc::new(palette);
        Self {
            world: World::new(),
            round: RoundState::new(Arc::clone(&palette)),
            palette,
            director: EntityDirector::default(),
            coordinator: ColorCycleCoordinator::new(),
            tally: ImpostorTally::new(),
            scene,
            bounds: None,
            ground: Box::new(FlatGround::default()),
            recolor: Box::new(NullPresenter),
            announcer: Box::new(NullPresenter),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_config(mut self, config: SpawnConfig) -> Self {
        self.director = EntityDirector::new(config);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_ground(mut self, ground: impl GroundProbe + 'static) -> Self {
        self.ground = Box::new(ground);
        self
    }

    pub fn with_recolor(mut self, recolor: impl Recolor + 'static) -> Self {
        self.recolor = Box::new(recolor);
        self
    }

    pub fn with_announcer(mut self, announcer: impl ColorAnnouncer + 'static) -> Self {
        self.announcer = Box::new(announcer);
        self
    }

    /// Deterministic sampling for tests and replays.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Set the clue pairs for a new round and forget last round's colour.
    pub fn start_round(&mut self, pairs: Vec<CluePair>) {
        self.coordinator.stop();
        self.round.set_allowed_pairs(pairs);
        self.round.reset_round();
    }

    /// Spawn the round's population, then start cycling if the scene asks.
    pub fn start_spawning_pass(&mut self) -> Result<SpawnReport, SpawnError> {
        self.coordinator.stop();
        self.round.clear_impostor_color_override();
        self.tally.reset();

        let env = SpawnEnv {
            round: &self.round,
            scene: &self.scene,
            bounds: self.bounds.as_ref(),
            ground: self.ground.as_ref(),
        };
        let report = self.director.start_spawning_pass(
            env,
            &mut self.world,
            self.recolor.as_mut(),
            &mut self.tally,
            &mut self.rng,
        )?;

        if let Some(seconds) = self.scene.color_shift_seconds {
            let interval = Duration::try_from_secs_f32(seconds).unwrap_or_else(|_| {
                log::warn!("Invalid color shift interval {}s in {}", seconds, self.scene.name);
                Duration::ZERO
            });
            let Session {
                world,
                palette,
                round,
                director,
                coordinator,
                recolor,
                announcer,
                rng,
                ..
            } = self;
            let mut targets = CycleTargets {
                world,
                registry: director.registry_mut(),
                palette,
                round,
                recolor: recolor.as_mut(),
                announcer: announcer.as_mut(),
            };
            coordinator.start(interval, &mut targets, rng);
        }

        Ok(report)
    }

    /// Advance timers by unscaled frame time. Returns whether the impostor
    /// colour changed.
    pub fn update(&mut self, dt: Duration) -> bool {
        let Session {
            world,
            palette,
            round,
            director,
            coordinator,
            recolor,
            announcer,
            rng,
            ..
        } = self;
        let mut targets = CycleTargets {
            world,
            registry: director.registry_mut(),
            palette,
            round,
            recolor: recolor.as_mut(),
            announcer: announcer.as_mut(),
        };
        coordinator.advance(dt, &mut targets, rng)
    }

    /// Player hit on `entity`. `None` if it no longer exists or is not one
    /// of this round's NPCs.
    pub fn eliminate(&mut self, entity: Entity) -> Option<Verdict> {
        eliminate(
            &mut self.world,
            &self.round,
            self.director.registry_mut(),
            &mut self.tally,
            entity,
        )
    }

    /// Stop cycling and remove the round's NPCs. The tally is kept for
    /// scoring until the next pass.
    pub fn end_round(&mut self) {
        self.coordinator.stop();
        self.director.clear_population(&mut self.world);
        self.round.reset_round();
    }

    /// Switch scenes. Ends the current round.
    pub fn set_scene(&mut self, scene: SceneProfile, bounds: Option<Bounds>) {
        self.end_round();
        self.scene = scene;
        self.bounds = bounds;
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn round_state(&self) -> &RoundState {
        &self.round
    }

    pub fn impostor_color_id(&self) -> Option<ColorId> {
        self.round.impostor_color_id()
    }

    pub fn is_impostor_color(&self, color_id: ColorId) -> bool {
        self.round.is_impostor_color(color_id)
    }

    pub fn scene(&self) -> &SceneProfile {
        &self.scene
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn registry(&self) -> &EntityRegistry {
        self.director.registry()
    }

    pub fn director(&self) -> &EntityDirector {
        &self.director
    }

    pub fn coordinator(&self) -> &ColorCycleCoordinator {
        &self.coordinator
    }

    pub fn tally(&self) -> &ImpostorTally {
        &self.tally
    }

    pub fn player(&self) -> Option<Entity> {
        self.director.player()
    }

    /// Live civilians.
    pub fn civilian_count(&self) -> usize {
        self.count_live(self.registry().civilians())
    }

    /// Live impostors.
    pub fn impostor_count(&self) -> usize {
        self.count_live(self.registry().impostors())
    }

    fn count_live(&self, entities: &[Entity]) -> usize {
        entities.iter().filter(|&&e| self.world.contains(e)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Identity;
    use impostor_logic::geometry::Vec3;
    use impostor_logic::palette::{PaletteEntry, Rgba};
    use impostor_logic::paths::ShapeType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedLog(Rc<RefCell<Vec<String>>>);

    impl ColorAnnouncer for SharedLog {
        fn announce_color_change(&mut self, color_name: &str) {
            self.0.borrow_mut().push(color_name.to_string());
        }
        fn set_indicator_color(&mut self, _color_id: ColorId) {}
    }

    fn palette() -> Palette {
        Palette::new(vec![
            PaletteEntry::new("Red", Rgba::rgb(255, 0, 0)),
            PaletteEntry::new("Orange", Rgba::rgb(255, 165, 0)),
            PaletteEntry::new("Yellow", Rgba::rgb(255, 255, 0)),
            PaletteEntry::new("Blue", Rgba::rgb(0, 0, 255)),
        ])
    }

    fn pairs() -> Vec<CluePair> {
        vec![CluePair::new(ShapeType::Triangle, 0), CluePair::new(ShapeType::Square, 0)]
    }

    fn arena() -> Bounds {
        Bounds::new(Vec3::ZERO, Vec3::new(50.0, 5.0, 50.0))
    }

    #[test]
    fn test_spawn_without_bounds_is_error() {
        let mut session = Session::new(palette(), SceneProfile::plain("Void")).with_seed(1);
        session.start_round(pairs());
        assert_eq!(session.start_spawning_pass(), Err(SpawnError::MissingBounds));
        assert_eq!(session.world().len(), 0);
    }

    #[test]
    fn test_plain_scene_does_not_cycle() {
        let mut session = Session::new(palette(), SceneProfile::plain("Park"))
            .with_bounds(arena())
            .with_seed(2);
        session.start_round(pairs());
        session.start_spawning_pass().unwrap();
        assert!(!session.coordinator().is_running());
        assert_eq!(session.impostor_color_id(), Some(0));
        assert!(!session.update(Duration::from_secs(60)));
    }

    #[test]
    fn test_cycling_scene_rotates_on_update() {
        let log = SharedLog::default();
        let mut session = Session::new(palette(), SceneProfile::builtin("LvL3"))
            .with_bounds(arena())
            .with_announcer(log.clone())
            .with_seed(3);
        session.start_round(pairs());
        session.start_spawning_pass().unwrap();

        assert!(session.coordinator().is_running());
        assert_eq!(session.impostor_color_id(), Some(0));
        assert!(!session.update(Duration::from_secs(14)));
        assert!(session.update(Duration::from_secs(1)));
        assert_eq!(session.impostor_color_id(), Some(1));
        assert_eq!(*log.0.borrow(), vec!["Orange".to_string()]);

        for &e in session.registry().impostors() {
            assert_eq!(session.world().get::<&Identity>(e).unwrap().color_id, 1);
        }
    }

    #[test]
    fn test_eliminate_all_impostors() {
        let mut session = Session::new(palette(), SceneProfile::plain("Park"))
            .with_bounds(arena())
            .with_seed(4);
        session.start_round(pairs());
        let report = session.start_spawning_pass().unwrap();

        let civilian = session.registry().civilians()[0];
        let civilian_color = session.world().get::<&Identity>(civilian).unwrap().color_id;
        let expected = if civilian_color == 0 { Verdict::Correct } else { Verdict::Wrong };
        assert_eq!(session.eliminate(civilian), Some(expected));
        assert_eq!(session.eliminate(civilian), None);

        let impostors: Vec<Entity> = session.registry().impostors().to_vec();
        for e in impostors {
            assert_eq!(session.eliminate(e), Some(Verdict::Correct));
        }
        assert!(session.tally().is_cleared());
        assert_eq!(session.tally().total_spawned, report.impostors);
        assert_eq!(session.impostor_count(), 0);
    }

    #[test]
    fn test_eliminate_leaves_player_anchor() {
        let mut session = Session::new(palette(), SceneProfile::plain("Park"))
            .with_bounds(arena())
            .with_seed(6);
        session.start_round(pairs());
        let report = session.start_spawning_pass().unwrap();
        let player = session.player().unwrap();

        assert_eq!(session.eliminate(player), None);
        assert!(session.world().contains(player));
        assert_eq!(session.player(), Some(player));
        assert_eq!(session.tally().remaining, report.impostors);

        session.start_spawning_pass().unwrap();
        assert_eq!(session.player(), Some(player));
    }

    #[test]
    fn test_end_round_clears_population() {
        let mut session = Session::new(palette(), SceneProfile::builtin("LvL2"))
            .with_bounds(arena())
            .with_seed(5);
        session.start_round(pairs());
        session.start_spawning_pass().unwrap();
        assert!(session.civilian_count() > 0);

        session.end_round();
        assert!(!session.coordinator().is_running());
        assert_eq!(session.civilian_count(), 0);
        assert_eq!(session.round_state().impostor_color_override(), None);
        // Player survives.
        assert_eq!(session.world().len(), 1);
    }
}
