//! On-screen controls of the placement page.

/// Button and instruction state, plus routing of UI input.
pub mod controls;

/// DOM buttons and canvas of the browser build.
#[cfg(target_arch = "wasm32")]
pub mod page;
