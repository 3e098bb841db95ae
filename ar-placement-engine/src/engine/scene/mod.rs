//! Scene state driven by the placement pipeline.
//!
//! The reticle follows the latest hit-test pose; placed cubes are spawned
//! once and never move.

/// Placed marker cubes and their append-only registry.
pub mod placed_objects;

/// Placement reticle transform and visibility.
pub mod reticle;
