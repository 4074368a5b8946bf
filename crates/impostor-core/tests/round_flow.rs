//! Integration tests for a full round: spawn, rotate, eliminate, switch scene.
//!
//! Runs a `Session` headless with seeded sampling and recording presenters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use hecs::Entity;
use impostor_core::prelude::*;
use impostor_logic::geometry::{Bounds, Vec3};
use impostor_logic::palette::Rgba;
use impostor_logic::paths::ShapeType;

// ── Helpers ────────────────────────────────────────────────────────────

/// Presenter whose recordings stay readable after it is boxed.
#[derive(Clone, Default)]
struct Shared(Rc<RefCell<RecordingPresenter>>);

impl Recolor for Shared {
    fn apply_color(&mut self, entity: Entity, color_id: ColorId, is_impostor: bool) {
        self.0.borrow_mut().apply_color(entity, color_id, is_impostor);
    }
}

impl ColorAnnouncer for Shared {
    fn announce_color_change(&mut self, color_name: &str) {
        self.0.borrow_mut().announce_color_change(color_name);
    }
    fn set_indicator_color(&mut self, color_id: ColorId) {
        self.0.borrow_mut().set_indicator_color(color_id);
    }
    fn show_indicator(&mut self) {
        self.0.borrow_mut().show_indicator();
    }
}

fn palette() -> Palette {
    Palette::from_json(
        r#"{"entries": [
            {"name": "Red", "color": {"r": 220, "g": 30, "b": 30}},
            {"name": "Orange", "color": {"r": 255, "g": 140, "b": 0}},
            {"name": "Pink", "color": {"r": 255, "g": 130, "b": 190}},
            {"name": "Yellow", "color": {"r": 245, "g": 215, "b": 40}},
            {"name": "Green", "color": {"r": 40, "g": 170, "b": 70}},
            {"name": "Blue", "color": {"r": 40, "g": 90, "b": 220}},
            {"name": "Tomato", "color": {"r": 255, "g": 99, "b": 71}},
            {"name": "Magenta", "color": {"r": 255, "g": 0, "b": 255}}
        ]}"#,
    )
    .unwrap()
}

fn red_pairs() -> Vec<CluePair> {
    vec![CluePair::new(ShapeType::Circle, 0), CluePair::new(ShapeType::Pentagon, 0)]
}

fn arena() -> Bounds {
    Bounds::new(Vec3::ZERO, Vec3::new(64.0, 4.0, 48.0))
}

fn colors(session: &Session, entities: &[Entity]) -> Vec<ColorId> {
    entities
        .iter()
        .map(|&e| session.world().get::<&Identity>(e).unwrap().color_id)
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn rotation_keeps_impostors_camouflaged() {
    let presenter = Shared::default();
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL3"))
        .with_bounds(arena())
        .with_recolor(presenter.clone())
        .with_announcer(presenter.clone())
        .with_seed(99);
    session.start_round(red_pairs());
    session.start_spawning_pass().unwrap();

    let sequence = session.coordinator().sequence().to_vec();
    assert_eq!(sequence, vec![0, 1, 2, 3, 4]);

    for step in 0..sequence.len() * 2 {
        let current = session.impostor_color_id().unwrap();
        assert_eq!(current, sequence[step % sequence.len()]);

        let impostors = colors(&session, session.registry().impostors());
        assert!(impostors.iter().all(|&c| c == current));
        let civilians = colors(&session, session.registry().civilians());
        assert!(!civilians.contains(&current));
        for &other in sequence.iter().filter(|&&c| c != current) {
            assert!(civilians.contains(&other), "no civilian wears {other}");
        }

        assert!(session.update(Duration::from_secs(15)));
    }

    let recorded = presenter.0.borrow();
    assert_eq!(recorded.announcements.len(), sequence.len() * 2);
    assert_eq!(recorded.announcements[0], "Orange");
    assert!(recorded.indicator_shown);
}

#[test]
fn recolor_notifications_match_world_state() {
    let presenter = Shared::default();
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL2"))
        .with_bounds(arena())
        .with_recolor(presenter.clone())
        .with_seed(4);
    session.start_round(red_pairs());
    session.start_spawning_pass().unwrap();
    session.update(Duration::from_secs(15));

    let recorded = presenter.0.borrow();
    let mut last: HashMap<Entity, ColorId> = HashMap::new();
    for &(e, c, _) in &recorded.recolors {
        last.insert(e, c);
    }
    for (e, id) in session.world().query::<&Identity>().iter() {
        assert_eq!(last.get(&e), Some(&id.color_id));
    }
}

#[test]
fn focus_scene_round() {
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL1"))
        .with_bounds(arena())
        .with_seed(12);
    session.start_round(vec![
        CluePair::new(ShapeType::Square, 5),
        CluePair::new(ShapeType::Triangle, 5),
    ]);
    let report = session.start_spawning_pass().unwrap();

    assert!(report.impostors >= 10);
    assert!(!session.coordinator().is_running());
    // Focus impostors wear red whatever the clue colour.
    assert!(colors(&session, session.registry().impostors()).iter().all(|&c| c == 0));
    // Warm subset: Orange, Pink, Tomato, Magenta.
    assert!(colors(&session, session.registry().civilians())
        .iter()
        .all(|c| [1, 2, 6, 7].contains(c)));

    assert!(session.scene().shade_filter);
    let shade = session
        .palette()
        .color_for_role(0, true, session.scene().shade_filter, session.impostor_color_id());
    assert_eq!(shade, Rgba::rgb(255, 0, 0));
}

#[test]
fn cycling_focus_scene_renders_raw_colors() {
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL2"))
        .with_bounds(arena())
        .with_seed(13);
    session.start_round(red_pairs());
    session.start_spawning_pass().unwrap();

    assert!(session.scene().focus);
    assert!(!session.scene().shade_filter);
    let civilian = session.registry().civilians()[0];
    let id = colors(&session, &[civilian])[0];
    let shown = session
        .palette()
        .color_for_role(id, false, session.scene().shade_filter, session.impostor_color_id());
    assert_eq!(shown, session.palette().color(id));
}

#[test]
fn clearing_a_round_then_switching_scene() {
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL4"))
        .with_bounds(arena())
        .with_seed(8);
    session.start_round(red_pairs());
    let report = session.start_spawning_pass().unwrap();

    let impostors = session.registry().impostors().to_vec();
    for e in impostors {
        assert_eq!(session.eliminate(e), Some(Verdict::Correct));
    }
    assert!(session.tally().is_cleared());
    assert_eq!(session.tally().eliminated, report.impostors);

    let player = session.player();
    session.set_scene(SceneProfile::builtin("LvL3"), Some(arena()));
    session.start_round(red_pairs());
    session.start_spawning_pass().unwrap();

    assert_eq!(session.player(), player);
    assert!(session.coordinator().is_running());
    assert_eq!(session.tally().eliminated, 0);
    assert!(session.impostor_count() > 0);
}

#[test]
fn scene_without_bounds_degrades() {
    let mut session = Session::new(palette(), SceneProfile::builtin("LvL3")).with_seed(1);
    session.start_round(red_pairs());
    assert_eq!(session.start_spawning_pass(), Err(SpawnError::MissingBounds));
    assert!(!session.coordinator().is_running());
    assert_eq!(session.civilian_count(), 0);
    assert!(!session.update(Duration::from_secs(30)));
}
