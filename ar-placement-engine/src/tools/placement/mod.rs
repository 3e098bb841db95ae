//! Placement state machine.
//!
//! ## States
//!
//! ```text
//! Idle ──(PlaceRequest, support_ready ∧ has_valid_hit ∧ ¬is_placing)──> Placing
//! Placing ──(cube spawned + save dispatched, success or not)──────────> Idle
//! ```
//!
//! Triggers arriving while `Placing` are dropped, never queued. The cube is
//! committed to the scene before the save request is dispatched, and a failed
//! save never removes it.

/// Trigger handling, the per-frame hit consumer and the commit path.
pub mod requests;

/// Guard flags and the `Idle`/`Placing` transitions.
pub mod state;

pub use requests::{PendingPlacement, PlaceRequest, PlaceTrigger};
pub use state::{PlacementGuards, PlacementPhase};
