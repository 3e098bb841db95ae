//! Capability check that unlocks the placement pipeline.
//!
//! Evaluated once at startup and again after every session end. The three
//! probe answers are folded into a single [`SupportGuidance`], checked in
//! order: secure context, then WebXR presence, then immersive-AR support.

/// Gate systems and the evaluation task.
pub mod gate;

/// Pure mapping from probe answers to user guidance.
pub mod guidance;

/// Capability probes.
pub mod probe;

pub use guidance::{SupportGuidance, SupportStatus, guidance};
pub use probe::CapabilityProbe;
