//! Pure round logic for Impostor Field.
//!
//! This crate contains the game logic that is independent of any ECS,
//! renderer, or engine. Functions take plain data (and an RNG where
//! sampling is involved) and return results, making them unit-testable
//! and deterministic under a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Spawn config, scene profiles, validation |
//! | [`constants`] | Colour keywords, scene names, shipped tuning |
//! | [`cycle`] | Camouflage rotation sequence and decoy colour pools |
//! | [`geometry`] | Vec3, movement bounds, clearance capsules |
//! | [`palette`] | Colour table, keyword matching, focus-scene shading |
//! | [`paths`] | Shapes and per-entity patrol path templates |
//! | [`placement`] | Grounded, spaced sampling with relaxation |
//! | [`population`] | Density-driven civilian/impostor counts |
//! | [`round_state`] | Clue pairs and the impostor colour oracle |

pub mod config;
pub mod constants;
pub mod cycle;
pub mod geometry;
pub mod palette;
pub mod paths;
pub mod placement;
pub mod population;
pub mod round_state;
