//! Shared constants for the AR placement workspace.
//!
//! Kept free of engine dependencies so the API service and the engine agree
//! on wire-level values (port, route paths) without pulling in Bevy.

pub mod api;
pub mod guidance;
pub mod placement;
pub mod reticle;
pub mod ui;
