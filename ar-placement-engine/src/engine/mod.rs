//! Engine side of the placement pipeline: app assembly, XR substrate
//! integration, scene state and frame hand-off to the renderer.

/// Application setup and schedule.
pub mod core;

/// Frame snapshot handed to the rendering substrate.
pub mod render;

/// Reticle and placed objects.
pub mod scene;

/// Session lifecycle, hit-test acquisition and the per-frame driver.
pub mod xr;
