//! Immersive session plumbing between the XR substrate and the ECS world.
//!
//! ## Frame flow
//!
//! ```text
//! First      drive_xr_tasks        poll substrate futures (session, hit-test, probe)
//! PreUpdate  drain_xr_inbox        completed tasks -> events / HitTestResources
//! Update     Lifecycle             session start/end, page visibility, toggles
//!            Place                 triggers queued since the previous frame
//!            Sample                sample_hit_test -> FrameSampled
//!            Consume               reticle + placement guards
//! Last       render_frame          FrameRenderer
//! ```
//!
//! Substrate futures never block a frame: they are polled cooperatively on
//! the main thread and report back through [`tasks::XrInbox`].

/// WebXR binding for the browser build.
#[cfg(target_arch = "wasm32")]
pub mod browser;

/// Per-frame hit-test sampling and the animation-loop runner.
pub mod frame_loop;

/// Acquisition and release of the hit-test source and its reference spaces.
pub mod hit_test;

/// Session start/end transitions, toggles and page visibility handling.
pub mod lifecycle;

/// Traits and handle types implemented by an XR substrate.
pub mod substrate;

/// Cooperative executor and completion inbox for substrate futures.
pub mod tasks;
