//! Impostor Field Headless Round Harness
//!
//! Validates round logic and shipped data without a renderer.
//! Runs entirely in-process: no engine, no input, no audio.
//!
//! Usage:
//!   cargo run -p impostor-simtest
//!   cargo run -p impostor-simtest -- --verbose
//!   cargo run -p impostor-simtest -- --json
//!   cargo run -p impostor-simtest -- --seed 42

use std::time::Duration;

use env_logger::Env;
use hecs::Entity;
use impostor_core::prelude::*;
use impostor_logic::config::{scene_table_from_json, validate_palette, validate_scene, validate_spawn_config};
use impostor_logic::constants::keywords;
use impostor_logic::cycle::build_cycle_sequence;
use impostor_logic::geometry::{Bounds, Vec3};
use impostor_logic::paths::ShapeType;
use impostor_logic::placement::{FlatGround, SpatialPlacement};
use impostor_logic::population::{resolve_civilian_count, resolve_impostor_count, DensityRules};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// ── Shipped data (same JSON a game build loads) ─────────────────────────
const PALETTE_JSON: &str = include_str!("../../../data/palette.json");
const SCENES_JSON: &str = include_str!("../../../data/scenes.json");

/// Frame step used when simulating scenes.
const FRAME: Duration = Duration::from_millis(16);

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let seed = args
            .iter()
            .position(|a| a == "--seed")
            .and_then(|i| args.get(i + 1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(7);
        Self {
            verbose: args.iter().any(|a| a == "--verbose"),
            json: args.iter().any(|a| a == "--json"),
            seed,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opts = Options::from_args();
    if !opts.json {
        println!("=== Impostor Field Round Harness (seed {}) ===\n", opts.seed);
    }

    let mut results = Vec::new();

    // 1. Shipped data
    let palette = match Palette::from_json(PALETTE_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::new("palette_parse", false, e.to_string()));
            finish(&results, &opts);
            return;
        }
    };
    results.extend(validate_data(&palette, &opts));

    // 2. Spatial placement
    results.extend(validate_placement(&opts));

    // 3. Population sizing
    results.extend(validate_population(&opts));

    // 4. Colour oracle
    results.extend(validate_round_state(&palette, &opts));

    // 5. Full rounds per scene
    let scenes = scene_table_from_json(SCENES_JSON).unwrap_or_default();
    for scene in &scenes {
        results.extend(validate_scene_round(&palette, scene, &opts));
    }

    finish(&results, &opts);
}

fn finish(results: &[TestResult], opts: &Options) {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if opts.json {
        match serde_json::to_string_pretty(results) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode results: {}", e),
        }
    } else {
        println!();
        for r in results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(title: &str, opts: &Options) {
    if !opts.json {
        println!("--- {} ---", title);
    }
}

// ── 1. Shipped Data ─────────────────────────────────────────────────────

fn validate_data(palette: &Palette, opts: &Options) -> Vec<TestResult> {
    section("Shipped Data", opts);
    let mut results = Vec::new();

    let errors = validate_palette(palette);
    results.push(TestResult::new(
        "palette_valid",
        errors.is_empty(),
        format!("{} colors, {} problems", palette.len(), errors.len()),
    ));

    results.push(TestResult::new(
        "palette_has_impostor_red",
        palette.find_by_keyword(keywords::IMPOSTOR).is_some(),
        format!("red -> {:?}", palette.find_by_keyword(keywords::IMPOSTOR)),
    ));

    let sequence = build_cycle_sequence(palette, &keywords::COLOR_CYCLE);
    results.push(TestResult::new(
        "palette_full_cycle",
        sequence.len() == keywords::COLOR_CYCLE.len(),
        format!(
            "cycle: {}",
            sequence
                .iter()
                .map(|&id| palette.name(id))
                .collect::<Vec<_>>()
                .join(" -> ")
        ),
    ));

    let warm = palette.ids_matching_any(&keywords::FOCUS_WARM);
    results.push(TestResult::new(
        "palette_warm_subset",
        !warm.is_empty() && !warm.iter().any(|&id| Some(id) == palette.find_by_keyword(keywords::IMPOSTOR)),
        format!("{} warm colors, none of them the impostor red", warm.len()),
    ));

    match scene_table_from_json(SCENES_JSON) {
        Ok(scenes) => {
            let problems: usize = scenes.iter().map(|s| validate_scene(s).len()).sum();
            results.push(TestResult::new(
                "scenes_valid",
                !scenes.is_empty() && problems == 0,
                format!("{} scenes, {} problems", scenes.len(), problems),
            ));
            let mismatched: Vec<&str> = scenes
                .iter()
                .filter(|s| **s != SceneProfile::builtin(&s.name))
                .map(|s| s.name.as_str())
                .collect();
            results.push(TestResult::new(
                "scenes_match_builtins",
                mismatched.is_empty(),
                if mismatched.is_empty() {
                    "scene table agrees with built-in profiles".to_string()
                } else {
                    format!("differs: {}", mismatched.join(", "))
                },
            ));
        }
        Err(e) => results.push(TestResult::new("scenes_parse", false, e.to_string())),
    }

    let config_errors = validate_spawn_config(&SpawnConfig::default());
    results.push(TestResult::new(
        "default_spawn_config_valid",
        config_errors.is_empty(),
        format!("{} problems", config_errors.len()),
    ));

    results
}

// ── 2. Spatial Placement ────────────────────────────────────────────────

fn validate_placement(opts: &Options) -> Vec<TestResult> {
    section("Spatial Placement", opts);
    let mut results = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
    let config = SpawnConfig::default();
    let placement = SpatialPlacement::new(config.placement);
    let ground = FlatGround { height: 1.5 };

    // Roomy field: everything should land at full spacing.
    let bounds = Bounds::new(Vec3::ZERO, Vec3::new(100.0, 6.0, 100.0));
    let mut occupied = Vec::new();
    let mut relaxed = 0;
    for _ in 0..30 {
        if placement.place(&bounds, &mut occupied, &ground, &mut rng).was_relaxed() {
            relaxed += 1;
        }
    }
    let min_gap = min_pairwise_distance(&occupied);
    results.push(TestResult::new(
        "placement_spacing_converges",
        min_gap >= config.placement.min_spacing && relaxed == 0,
        format!("30 points, min gap {:.2}, {} relaxed", min_gap, relaxed),
    ));

    results.push(TestResult::new(
        "placement_grounded_in_bounds",
        occupied
            .iter()
            .all(|p| bounds.contains_planar(p) && (p.y - ground.height).abs() < 1e-4),
        "all points inside footprint at ground height",
    ));

    // Crowded field: relaxation kicks in but nothing blocks.
    let tight = Bounds::new(Vec3::ZERO, Vec3::new(14.0, 4.0, 14.0));
    let mut crowded = Vec::new();
    let mut fallbacks = 0;
    relaxed = 0;
    for _ in 0..40 {
        let p = placement.place(&tight, &mut crowded, &ground, &mut rng);
        if p.is_fallback() {
            fallbacks += 1;
        } else if p.was_relaxed() {
            relaxed += 1;
        }
    }
    results.push(TestResult::new(
        "placement_crowded_never_blocks",
        crowded.len() == 40,
        format!("40 placed, {} relaxed, {} unspaced", relaxed, fallbacks),
    ));

    results
}

fn min_pairwise_distance(points: &[Vec3]) -> f32 {
    let mut min = f32::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            min = min.min(a.planar_distance(b));
        }
    }
    min
}

// ── 3. Population Sizing ────────────────────────────────────────────────

fn validate_population(opts: &Options) -> Vec<TestResult> {
    section("Population Sizing", opts);
    let mut results = Vec::new();
    let config = SpawnConfig::default();
    let rules = DensityRules::default();

    let mut last_civ = 0;
    let mut last_imp = 0;
    let mut monotonic = true;
    for step in 0..=100 {
        let area = step as f32 * 200.0;
        let civ = resolve_civilian_count(config.civilian_count, area, &rules);
        let imp = resolve_impostor_count(config.impostor_count, area, false, &rules);
        if civ < last_civ || imp < last_imp {
            monotonic = false;
        }
        last_civ = civ;
        last_imp = imp;
        if opts.verbose && step % 25 == 0 {
            println!("  area {:>6.0}: {:>3} civilians, {:>2} impostors", area, civ, imp);
        }
    }
    results.push(TestResult::new(
        "population_monotonic",
        monotonic,
        format!("area sweep 0..20000 ends at {} civilians, {} impostors", last_civ, last_imp),
    ));

    let zero = resolve_civilian_count(config.civilian_count, 0.0, &rules);
    let huge = resolve_civilian_count(config.civilian_count, 1.0e9, &rules);
    results.push(TestResult::new(
        "population_civilian_clamp",
        zero == rules.civilian_range.0 && huge == rules.civilian_range.1,
        format!("zero area {}, huge area {}", zero, huge),
    ));

    let strict = resolve_impostor_count(config.impostor_count, 0.0, true, &rules);
    results.push(TestResult::new(
        "population_strict_floor",
        strict >= rules.strict_impostor_floor,
        format!("focus scene minimum {}", strict),
    ));

    results
}

// ── 4. Colour Oracle ────────────────────────────────────────────────────

fn validate_round_state(palette: &Palette, opts: &Options) -> Vec<TestResult> {
    section("Colour Oracle", opts);
    let mut results = Vec::new();
    let mut round = RoundState::new(std::sync::Arc::new(palette.clone()));

    let red = palette.find_by_keyword(keywords::IMPOSTOR);
    results.push(TestResult::new(
        "oracle_derives_red",
        round.impostor_color_id() == red,
        format!("impostor color {:?}", round.impostor_color_id()),
    ));

    let other = palette.ids().find(|&id| Some(id) != red).unwrap_or(0);
    round.set_impostor_color_override(other);
    let overridden = round.is_impostor_color(other) && red.map_or(true, |r| !round.is_impostor_color(r));
    round.clear_impostor_color_override();
    let restored = round.impostor_color_id() == red && !round.is_impostor_color(other);
    results.push(TestResult::new(
        "oracle_override_roundtrip",
        overridden && restored,
        format!("override {} then back to {:?}", other, red),
    ));

    let empty = RoundState::new(std::sync::Arc::new(Palette::default()));
    results.push(TestResult::new(
        "oracle_empty_palette",
        empty.impostor_color_id().is_none() && (0..32).all(|id| !empty.is_impostor_color(id)),
        "no id matches with an empty palette",
    ));

    results
}

// ── 5. Scene Rounds ─────────────────────────────────────────────────────

fn validate_scene_round(palette: &Palette, scene: &SceneProfile, opts: &Options) -> Vec<TestResult> {
    section(&format!("Scene {}", scene.name), opts);
    let mut results = Vec::new();
    let tag = scene.name.to_lowercase();

    let red = palette.find_by_keyword(keywords::IMPOSTOR).unwrap_or(0);
    let bounds = Bounds::new(Vec3::new(5.0, 0.0, -5.0), Vec3::new(48.0, 4.0, 36.0));

    let mut session = Session::new(palette.clone(), scene.clone())
        .with_bounds(bounds)
        .with_seed(opts.seed);
    session.start_round(vec![
        CluePair::new(ShapeType::Circle, red),
        CluePair::new(ShapeType::Triangle, red),
    ]);

    let report = match session.start_spawning_pass() {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::new(format!("{}_spawn", tag), false, e.to_string()));
            return results;
        }
    };

    let rules = &session.director().config().density;
    let area = bounds.planar_area();
    let expected_imp = resolve_impostor_count(session.director().config().impostor_count, area, scene.focus, rules);
    results.push(TestResult::new(
        format!("{}_population", tag),
        report.impostors == expected_imp && session.civilian_count() as u32 == report.civilians,
        format!(
            "{} civilians, {} impostors ({} relaxed, {} unspaced)",
            report.civilians, report.impostors, report.relaxed, report.fallbacks
        ),
    ));

    let player_pos = session
        .world()
        .get::<&Transform>(report.player)
        .map(|t| t.position)
        .unwrap_or(Vec3::ZERO);
    let radius = session.director().config().player_exclusion_radius;
    let intruders = npc_entities(&session)
        .into_iter()
        .filter(|&e| {
            session
                .world()
                .get::<&Transform>(e)
                .map(|t| t.position.planar_distance(&player_pos) < radius)
                .unwrap_or(false)
        })
        .count();
    results.push(TestResult::new(
        format!("{}_player_clearance", tag),
        report.fallbacks > 0 || intruders == 0,
        format!("{} NPCs inside {:.1}m of the player", intruders, radius),
    ));

    if scene.focus {
        let warm = palette.ids_matching_any(&keywords::FOCUS_WARM);
        let civilians_warm = session
            .registry()
            .civilians()
            .iter()
            .all(|&e| warm.contains(&color_of(&session, e)));
        results.push(TestResult::new(
            format!("{}_focus_civilians_warm", tag),
            scene.requires_color_cycle() || civilians_warm,
            "civilians drawn from the warm subset",
        ));
    }

    if scene.requires_color_cycle() {
        results.extend(validate_cycling(&mut session, &tag, opts));
    } else {
        results.push(TestResult::new(
            format!("{}_static_color", tag),
            !session.coordinator().is_running() && session.impostor_color_id() == Some(red),
            format!("impostor color stays {}", palette.name(red)),
        ));
    }

    results.extend(validate_elimination(&mut session, &tag));
    results
}

fn validate_cycling(session: &mut Session, tag: &str, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();
    let interval = session.coordinator().interval().unwrap_or_default();

    results.push(TestResult::new(
        format!("{}_cycle_running", tag),
        session.coordinator().is_running(),
        format!("{} colors every {:.1}s", session.coordinator().sequence().len(), interval.as_secs_f32()),
    ));

    // One minute of frames.
    let mut ticks = 0;
    let mut camouflage_ok = true;
    let mut seen = Vec::new();
    let frames = 60_000 / FRAME.as_millis() as u32;
    for _ in 0..frames {
        if session.update(FRAME) {
            ticks += 1;
            let Some(current) = session.impostor_color_id() else {
                camouflage_ok = false;
                continue;
            };
            if !seen.contains(&current) {
                seen.push(current);
            }
            camouflage_ok &= impostors_wear(session, current) && !civilians_wear(session, current);
        }
    }

    let expected = (60.0 / interval.as_secs_f32().max(0.1)).floor() as u32;
    results.push(TestResult::new(
        format!("{}_cycle_ticks", tag),
        ticks == expected,
        format!("{} ticks in 60s (expected {}), {} distinct colors", ticks, expected, seen.len()),
    ));
    results.push(TestResult::new(
        format!("{}_cycle_camouflage", tag),
        camouflage_ok,
        "impostors wear the active color, civilians never do",
    ));

    if opts.verbose {
        let names: Vec<&str> = seen.iter().map(|&id| session.palette().name(id)).collect();
        println!("  {} rotation: {}", tag, names.join(" -> "));
    }
    results
}

fn validate_elimination(session: &mut Session, tag: &str) -> Vec<TestResult> {
    let mut results = Vec::new();
    let Some(current) = session.impostor_color_id() else {
        return results;
    };

    // Miss first: a civilian not wearing the impostor colour.
    let decoy = session
        .registry()
        .civilians()
        .iter()
        .copied()
        .find(|&e| color_of(session, e) != current);
    if let Some(decoy) = decoy {
        results.push(TestResult::new(
            format!("{}_wrong_hit", tag),
            session.eliminate(decoy) == Some(Verdict::Wrong),
            "decoy hit judged wrong",
        ));
    }

    let targets: Vec<Entity> = session
        .registry()
        .impostors()
        .iter()
        .copied()
        .filter(|&e| color_of(session, e) == current)
        .collect();
    let correct = targets
        .into_iter()
        .filter(|&e| session.eliminate(e) == Some(Verdict::Correct))
        .count();
    let tally = *session.tally();
    results.push(TestResult::new(
        format!("{}_round_cleared", tag),
        tally.is_cleared() && correct as u32 == tally.total_spawned,
        format!("{}/{} impostors eliminated", tally.eliminated, tally.total_spawned),
    ));

    session.end_round();
    results
}

fn npc_entities(session: &Session) -> Vec<Entity> {
    session
        .world()
        .query::<&Npc>()
        .iter()
        .map(|(e, _)| e)
        .collect()
}

fn color_of(session: &Session, entity: Entity) -> ColorId {
    session
        .world()
        .get::<&Identity>(entity)
        .map(|id| id.color_id)
        .unwrap_or(ColorId::MAX)
}

fn impostors_wear(session: &Session, color: ColorId) -> bool {
    session
        .registry()
        .impostors()
        .iter()
        .all(|&e| color_of(session, e) == color)
}

fn civilians_wear(session: &Session, color: ColorId) -> bool {
    session
        .registry()
        .civilians()
        .iter()
        .any(|&e| color_of(session, e) == color)
}
