//! NPC colour palette and keyword matching.
//!
//! A palette is an ordered table; an entry's index is its colour id.
//! Which colours count as "red", "warm" or part of the cycle is decided by
//! keyword matching against entry names, never by RGB values.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Palette index.
pub type ColorId = u32;

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// One named palette colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Rgba,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Pure red shown for the impostor colour under the shade filter.
const FOCUS_IMPOSTOR_SHADE: Rgba = Rgba::rgb(255, 0, 0);

/// Dark reds every non-impostor colour collapses to under the shade filter.
const FOCUS_SHADES: [Rgba; 5] = [
    Rgba::rgb(150, 0, 24),
    Rgba::rgb(255, 99, 71),
    Rgba::rgb(139, 0, 0),
    Rgba::rgb(128, 0, 32),
    Rgba::rgb(127, 23, 52),
];

/// Immutable colour table. Index = colour id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Parse a palette from `{"entries": [{"name": .., "color": {..}}]}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let palette: Palette = serde_json::from_str(json)?;
        Ok(palette)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// All valid colour ids, in order.
    pub fn ids(&self) -> impl Iterator<Item = ColorId> {
        0..self.entries.len() as ColorId
    }

    pub fn contains(&self, id: ColorId) -> bool {
        (id as usize) < self.entries.len()
    }

    /// Display colour; white for unknown ids.
    pub fn color(&self, id: ColorId) -> Rgba {
        self.entries
            .get(id as usize)
            .map(|e| e.color)
            .unwrap_or(Rgba::WHITE)
    }

    /// Entry name; `"?"` for unknown ids.
    pub fn name(&self, id: ColorId) -> &str {
        self.entries
            .get(id as usize)
            .map(|e| e.name.as_str())
            .unwrap_or("?")
    }

    /// First entry whose name contains `keyword`.
    pub fn find_by_keyword(&self, keyword: &str) -> Option<ColorId> {
        self.entries
            .iter()
            .position(|e| name_matches_keyword(&e.name, keyword))
            .map(|i| i as ColorId)
    }

    /// Every entry whose name contains any of `keywords`, in palette order.
    pub fn ids_matching_any(&self, keywords: &[&str]) -> Vec<ColorId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| name_matches_any(&e.name, keywords))
            .map(|(i, _)| i as ColorId)
            .collect()
    }

    /// Colour a renderer should show for an entity.
    ///
    /// Pass the scene's `shade_filter` flag, not `focus`. Without the filter
    /// this is the raw palette colour. With it the impostor colour becomes pure red and everything else one of a
    /// handful of dark reds, so only the exact shade gives an impostor away.
    /// `impostor_color` is the round's current impostor colour, if known.
    pub fn color_for_role(
        &self,
        id: ColorId,
        is_impostor: bool,
        shade_filter: bool,
        impostor_color: Option<ColorId>,
    ) -> Rgba {
        if !shade_filter {
            return self.color(id);
        }

        let wears_impostor_color = match impostor_color {
            Some(current) => current == id,
            None => self
                .entries
                .get(id as usize)
                .map(|e| name_matches_keyword(&e.name, crate::constants::keywords::IMPOSTOR))
                .unwrap_or(false),
        };

        if is_impostor && wears_impostor_color {
            FOCUS_IMPOSTOR_SHADE
        } else {
            FOCUS_SHADES[id as usize % FOCUS_SHADES.len()]
        }
    }
}

/// Case-insensitive substring match. Empty names or keywords never match.
pub fn name_matches_keyword(name: &str, keyword: &str) -> bool {
    if name.is_empty() || keyword.is_empty() {
        return false;
    }
    name.to_lowercase().contains(&keyword.to_lowercase())
}

/// True if `name` matches at least one keyword.
pub fn name_matches_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name_matches_keyword(name, k))
}
