//! Game constants - colour keywords, scene names, tuning defaults.
//!
//! Keyword lists are matched case-insensitively as substrings of palette
//! entry names (see [`crate::palette::name_matches_keyword`]).

pub mod keywords {
    /// Palette names containing this identify the impostor colour.
    pub const IMPOSTOR: &str = "red";

    /// Rotation order for camouflage cycling.
    pub const COLOR_CYCLE: [&str; 5] = ["red", "orange", "pink", "yellow", "green"];

    /// Civilian colours allowed in focus scenes (close to red, never red).
    pub const FOCUS_WARM: [&str; 6] = ["raspberry", "carmine", "tomato", "pink", "magenta", "orange"];
}

pub mod scenes {
    pub const LEVEL_ONE: &str = "LvL1";
    pub const LEVEL_TWO: &str = "LvL2";
    pub const LEVEL_THREE: &str = "LvL3";
    pub const LEVEL_FOUR: &str = "LvL4";

    /// Scenes with focus colour rules.
    pub const FOCUS: [&str; 2] = [LEVEL_ONE, LEVEL_TWO];

    /// Scenes whose renderer collapses colours to red shades.
    pub const SHADE_FILTER: [&str; 1] = [LEVEL_ONE];

    /// Seconds between colour shifts in cycling scenes.
    pub const LEVEL_TWO_SHIFT_SECONDS: f32 = 15.0;
    pub const LEVEL_THREE_SHIFT_SECONDS: f32 = 15.0;
}

pub mod placement {
    pub const MIN_SPACING: f32 = 3.5;
    pub const RELAXATION_FACTOR: f32 = 0.85;
    pub const RELAXATION_ROUNDS: u32 = 6;
    pub const ATTEMPTS_PER_ROUND: u32 = 50;
    pub const EDGE_PADDING: f32 = 0.08;
    pub const SPREAD: f32 = 1.0;
    pub const PROBE_HEIGHT: f32 = 4.0;
    pub const PROBE_DISTANCE: f32 = 12.0;
    pub const DEFAULT_FLOOR: f32 = 0.0;
    pub const PLAYER_EXCLUSION_RADIUS: f32 = 2.5;
}

pub mod population {
    pub const BASE_CIVILIANS: u32 = 30;
    pub const BASE_IMPOSTORS: u32 = 4;
    pub const CIVILIANS_PER_HUNDRED: f32 = 1.15;
    pub const IMPOSTORS_PER_HUNDRED: f32 = 0.2;
    pub const CIVILIAN_RANGE: (u32, u32) = (45, 140);
    pub const IMPOSTOR_RANGE: (u32, u32) = (4, 14);
    pub const CIVILIAN_COUNT_MULTIPLIER: f32 = 1.45;
    pub const CIVILIAN_DENSITY_MULTIPLIER: f32 = 1.2;
    /// Minimum impostors in focus scenes.
    pub const STRICT_IMPOSTOR_FLOOR: u32 = 10;
}

pub mod paths {
    pub const CENTER_JITTER: f32 = 1.25;
    pub const RADIUS_MIN: f32 = 2.8;
    pub const RADIUS_MAX: f32 = 5.5;
    pub const CIRCLE_POINTS: u32 = 20;
    pub const PACE_SCALE: f32 = 0.55;
}

pub mod cycle {
    /// Shortest allowed interval between colour shifts, in milliseconds.
    pub const MIN_INTERVAL_MS: u64 = 100;
    /// Announcement name used when a palette entry has no name.
    pub const UNNAMED_COLOR: &str = "a new color";
}
