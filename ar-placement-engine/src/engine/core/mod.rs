//! Application assembly.
//!
//! Wires the placement pipeline into a Bevy [`App`](bevy_app::App) with the
//! schedule below, identical for native and WASM builds:
//!
//! ```text
//! Startup    request_initial_support_check
//! First      drive_xr_tasks          (poll substrate futures)
//! PreUpdate  drain_xr_inbox          (task results -> events)
//! Update     Lifecycle -> Place -> Sample -> Consume
//! Last       render_frame
//! ```

/// Plugin, backend bundle and app construction.
pub mod app_setup;
