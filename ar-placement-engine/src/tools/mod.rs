//! User-facing tools operating on the AR scene.
//!
//! Only placement exists today: tap the screen (or press the place button)
//! while the reticle is visible to drop a cube at the reticle transform.

/// Placement state machine and commit path.
pub mod placement;
