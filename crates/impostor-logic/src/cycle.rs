//! Camouflage rotation sequencing.
//!
//! The cycle walks a fixed keyword order through the palette. Civilians are
//! spread over the other cycle colours so they always share hues with the
//! impostor's previous and next colours.

use crate::palette::{ColorId, Palette};

/// Resolve `keywords` to palette ids in order, skipping misses and repeats.
///
/// If nothing resolves, the whole palette range is used. An empty palette
/// gives an empty sequence.
pub fn build_cycle_sequence(palette: &Palette, keywords: &[&str]) -> Vec<ColorId> {
    if palette.is_empty() {
        return Vec::new();
    }

    let mut ids: Vec<ColorId> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if let Some(id) = palette.find_by_keyword(keyword) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    if !ids.is_empty() && ids.len() < keywords.len() {
        log::warn!(
            "Only found {} of {} requested color-cycle palette entries",
            ids.len(),
            keywords.len()
        );
    }

    if ids.is_empty() {
        return palette.ids().collect();
    }
    ids
}

/// Colours civilians may wear while `impostor_color` is active.
///
/// Prefers the cycle sequence minus the impostor colour; falls back to the
/// whole palette minus the impostor colour.
pub fn decoy_color_pool(sequence: &[ColorId], palette_len: usize, impostor_color: ColorId) -> Vec<ColorId> {
    let mut pool: Vec<ColorId> = Vec::with_capacity(sequence.len());
    for &id in sequence {
        if id != impostor_color && !pool.contains(&id) {
            pool.push(id);
        }
    }

    if pool.is_empty() {
        pool = (0..palette_len as ColorId)
            .filter(|&id| id != impostor_color)
            .collect();
    }
    pool
}

/// Round-robin assignment of `pool` to `count` slots starting at `offset`.
pub fn round_robin(pool: &[ColorId], count: usize, offset: usize) -> Vec<ColorId> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count).map(|i| pool[(offset + i) % pool.len()]).collect()
}
