//! Round state - the single oracle for "which colour is the impostor".
//!
//! Resolution order for [`RoundState::impostor_color_id`]:
//! 1. An explicit override (set by colour cycling)
//! 2. The cached keyword lookup from a previous call
//! 3. First palette entry whose name contains `"red"`, cached
//!
//! Hit resolution asks [`RoundState::is_impostor_color`]; the answer only
//! changes when the override is set or cleared.

use std::cell::Cell;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::keywords;
use crate::palette::{ColorId, Palette};
use crate::paths::ShapeType;

/// A (shape, colour) hint shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CluePair {
    pub shape: ShapeType,
    pub color_id: ColorId,
}

impl CluePair {
    pub fn new(shape: ShapeType, color_id: ColorId) -> Self {
        Self { shape, color_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CachedColor {
    Unresolved,
    Resolved(Option<ColorId>),
}

/// Per-round clue pairs and impostor colour.
#[derive(Debug, Clone)]
pub struct RoundState {
    palette: Arc<Palette>,
    allowed_pairs: Vec<CluePair>,
    impostor_color_override: Option<ColorId>,
    cache: Cell<CachedColor>,
}

impl RoundState {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self {
            palette,
            allowed_pairs: Vec::new(),
            impostor_color_override: None,
            cache: Cell::new(CachedColor::Unresolved),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the round's clue pairs (normally exactly two).
    pub fn set_allowed_pairs(&mut self, pairs: Vec<CluePair>) {
        if pairs.len() != 2 {
            log::warn!("Round started with {} clue pairs, expected 2", pairs.len());
        }
        self.allowed_pairs = pairs;
    }

    pub fn allowed_pairs(&self) -> &[CluePair] {
        &self.allowed_pairs
    }

    /// Current impostor colour, or `None` when the palette has no match.
    pub fn impostor_color_id(&self) -> Option<ColorId> {
        if let Some(id) = self.impostor_color_override {
            return Some(id);
        }
        match self.cache.get() {
            CachedColor::Resolved(id) => id,
            CachedColor::Unresolved => {
                let id = self.palette.find_by_keyword(keywords::IMPOSTOR);
                self.cache.set(CachedColor::Resolved(id));
                id
            }
        }
    }

    pub fn impostor_color_override(&self) -> Option<ColorId> {
        self.impostor_color_override
    }

    pub fn set_impostor_color_override(&mut self, id: ColorId) {
        self.impostor_color_override = Some(id);
    }

    /// Drop the override and force a fresh keyword lookup on next read.
    pub fn clear_impostor_color_override(&mut self) {
        self.impostor_color_override = None;
        self.cache.set(CachedColor::Unresolved);
    }

    /// Whether an entity wearing `color_id` is a legitimate target.
    pub fn is_impostor_color(&self, color_id: ColorId) -> bool {
        self.impostor_color_id() == Some(color_id)
    }

    /// Hit check for a (shape, colour) pair. Only colour decides.
    pub fn matches_allowed(&self, _shape: ShapeType, color_id: ColorId) -> bool {
        self.is_impostor_color(color_id)
    }

    /// Forget override and cache ahead of a new round. Clue pairs are kept.
    pub fn reset_round(&mut self) {
        self.clear_impostor_color_override();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteEntry, Rgba};

    fn three_colors() -> Arc<Palette> {
        Arc::new(Palette::new(vec![
            PaletteEntry::new("Blue", Rgba::rgb(0, 0, 255)),
            PaletteEntry::new("Crimson Red", Rgba::rgb(220, 20, 60)),
            PaletteEntry::new("Green", Rgba::rgb(0, 128, 0)),
        ]))
    }

    #[test]
    fn test_keyword_derived_color() {
        let state = RoundState::new(three_colors());
        assert_eq!(state.impostor_color_id(), Some(1));
        assert!(state.is_impostor_color(1));
        assert!(!state.is_impostor_color(0));
    }

    #[test]
    fn test_override_then_clear() {
        let mut state = RoundState::new(three_colors());
        state.set_impostor_color_override(2);
        assert!(state.is_impostor_color(2));
        assert!(!state.is_impostor_color(1));

        state.clear_impostor_color_override();
        assert_eq!(state.impostor_color_override(), None);
        assert!(state.is_impostor_color(1));
        assert!(!state.is_impostor_color(2));
    }

    #[test]
    fn test_empty_palette_matches_nothing() {
        let state = RoundState::new(Arc::new(Palette::default()));
        assert_eq!(state.impostor_color_id(), None);
        for id in 0..16 {
            assert!(!state.is_impostor_color(id), "id {id} matched");
        }
    }

    #[test]
    fn test_no_red_entry() {
        let palette = Arc::new(Palette::new(vec![
            PaletteEntry::new("Blue", Rgba::WHITE),
            PaletteEntry::new("Green", Rgba::WHITE),
        ]));
        let state = RoundState::new(palette);
        assert_eq!(state.impostor_color_id(), None);
        assert!(!state.is_impostor_color(0));
    }

    #[test]
    fn test_matches_allowed_ignores_shape() {
        let state = RoundState::new(three_colors());
        assert!(state.matches_allowed(ShapeType::Circle, 1));
        assert!(state.matches_allowed(ShapeType::Triangle, 1));
        assert!(!state.matches_allowed(ShapeType::Circle, 0));
    }

    #[test]
    fn test_reset_round_keeps_pairs() {
        let mut state = RoundState::new(three_colors());
        state.set_allowed_pairs(vec![
            CluePair::new(ShapeType::Square, 1),
            CluePair::new(ShapeType::Circle, 2),
        ]);
        state.set_impostor_color_override(0);
        state.reset_round();
        assert_eq!(state.impostor_color_id(), Some(1));
        assert_eq!(state.allowed_pairs().len(), 2);
    }
}
