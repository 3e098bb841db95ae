use bevy_ecs::prelude::*;
use bevy_math::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    Idle,
    Placing,
}

/// Guard flags deciding whether a placement may start, plus the transform it would use.
///
/// A placement may start iff `support_ready && has_valid_hit && !is_placing`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlacementGuards {
    pub support_ready: bool,
    has_valid_hit: bool,
    is_placing: bool,
    placement_matrix: Mat4,
}

impl Default for PlacementGuards {
    fn default() -> Self {
        Self {
            support_ready: false,
            has_valid_hit: false,
            is_placing: false,
            placement_matrix: Mat4::IDENTITY,
        }
    }
}

impl PlacementGuards {
    pub fn phase(&self) -> PlacementPhase {
        if self.is_placing {
            PlacementPhase::Placing
        } else {
            PlacementPhase::Idle
        }
    }

    pub fn has_valid_hit(&self) -> bool {
        self.has_valid_hit
    }

    pub fn is_placing(&self) -> bool {
        self.is_placing
    }

    /// Last transform reported by a valid hit; identity after a session end.
    pub fn placement_matrix(&self) -> Mat4 {
        self.placement_matrix
    }

    pub fn can_place(&self) -> bool {
        self.support_ready && self.has_valid_hit && !self.is_placing
    }

    pub fn record_hit(&mut self, transform: Mat4) {
        self.placement_matrix = transform;
        self.has_valid_hit = true;
    }

    /// The placement matrix keeps the last valid transform.
    pub fn clear_hit(&mut self) {
        self.has_valid_hit = false;
    }

    /// Idle -> Placing. Returns a snapshot of the placement transform, or
    /// `None` when the gate is closed.
    pub fn try_begin(&mut self) -> Option<Mat4> {
        if !self.can_place() {
            return None;
        }
        self.is_placing = true;
        Some(self.placement_matrix)
    }

    /// Placing -> Idle.
    pub fn finish(&mut self) {
        self.is_placing = false;
    }

    pub fn reset_for_session_end(&mut self) {
        self.has_valid_hit = false;
        self.placement_matrix = Mat4::IDENTITY;
    }
}
