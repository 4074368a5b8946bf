//! Impostor Core - round engine for Impostor Field
//!
//! Populates a scene with civilians and camouflaged impostors and keeps the
//! impostor colour moving so the player has to watch the announcements.
//!
//! # Architecture
//!
//! The round uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: the player anchor, civilians, impostors
//! - **Components**: Pure data attached to entities (Transform, Identity, PathFollower)
//! - **Systems**: Spawning, colour cycling, elimination judging
//!
//! Rendering, movement and input stay outside; they plug in through the
//! traits in [`collaborators`] and [`impostor_logic::placement::GroundProbe`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use impostor_core::prelude::*;
//! use impostor_logic::geometry::{Bounds, Vec3};
//! use impostor_logic::palette::{PaletteEntry, Rgba};
//! use impostor_logic::paths::ShapeType;
//!
//! let palette = Palette::new(vec![
//!     PaletteEntry::new("Red", Rgba::rgb(220, 30, 30)),
//!     PaletteEntry::new("Orange", Rgba::rgb(255, 140, 0)),
//!     PaletteEntry::new("Green", Rgba::rgb(40, 170, 70)),
//! ]);
//! let mut session = Session::new(palette, SceneProfile::builtin("LvL3"))
//!     .with_bounds(Bounds::new(Vec3::ZERO, Vec3::new(60.0, 4.0, 60.0)));
//!
//! session.start_round(vec![
//!     CluePair::new(ShapeType::Circle, 0),
//!     CluePair::new(ShapeType::Square, 0),
//! ]);
//! session.start_spawning_pass().unwrap();
//!
//! loop {
//!     session.update(Duration::from_millis(16));
//! }
//! ```

pub mod collaborators;
pub mod components;
pub mod session;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::collaborators::{ColorAnnouncer, NullPresenter, Recolor, RecordingPresenter};
    pub use crate::components::*;
    pub use crate::session::Session;
    pub use crate::systems::*;
    pub use impostor_logic::config::{SceneProfile, SpawnConfig};
    pub use impostor_logic::palette::{ColorId, Palette};
    pub use impostor_logic::round_state::{CluePair, RoundState};
}
