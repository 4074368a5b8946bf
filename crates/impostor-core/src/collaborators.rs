//! Presentation seams.
//!
//! The round engine never touches renderers or UI directly. It tells a
//! [`Recolor`] when an NPC changes colour and a [`ColorAnnouncer`] when the
//! impostor colour rotates. [`NullPresenter`] drops everything and is what
//! headless runs and tests use.

use hecs::Entity;
use impostor_logic::palette::ColorId;

/// Applies an NPC's colour to whatever draws it.
pub trait Recolor {
    fn apply_color(&mut self, entity: Entity, color_id: ColorId, is_impostor: bool);
}

/// Player-facing notification of the current impostor colour.
pub trait ColorAnnouncer {
    /// The impostor colour rotated to `color_name`. Wording is up to the UI.
    fn announce_color_change(&mut self, color_name: &str);
    fn set_indicator_color(&mut self, color_id: ColorId);
    fn show_indicator(&mut self) {}
}

/// No-op presenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Recolor for NullPresenter {
    fn apply_color(&mut self, _entity: Entity, _color_id: ColorId, _is_impostor: bool) {}
}

impl ColorAnnouncer for NullPresenter {
    fn announce_color_change(&mut self, _color_name: &str) {}
    fn set_indicator_color(&mut self, _color_id: ColorId) {}
}

/// Presenter that records every call, for tests and the harness.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub recolors: Vec<(Entity, ColorId, bool)>,
    /// Colour names announced, in order.
    pub announcements: Vec<String>,
    pub indicator: Option<ColorId>,
    pub indicator_shown: bool,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent colour applied to `entity`.
    pub fn last_color_of(&self, entity: Entity) -> Option<ColorId> {
        self.recolors
            .iter()
            .rev()
            .find(|(e, _, _)| *e == entity)
            .map(|(_, id, _)| *id)
    }
}

impl Recolor for RecordingPresenter {
    fn apply_color(&mut self, entity: Entity, color_id: ColorId, is_impostor: bool) {
        self.recolors.push((entity, color_id, is_impostor));
    }
}

impl ColorAnnouncer for RecordingPresenter {
    fn announce_color_change(&mut self, color_name: &str) {
        self.announcements.push(color_name.to_string());
    }

    fn set_indicator_color(&mut self, color_id: ColorId) {
        self.indicator = Some(color_id);
    }

    fn show_indicator(&mut self) {
        self.indicator_shown = true;
    }
}
