use bevy_ecs::prelude::*;
use bevy_math::Mat4;

use crate::engine::xr::substrate::Pose;

/// Placement reticle: where a cube would land if placed now.
///
/// `visible` is true exactly when the most recent sampled frame produced a pose.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Reticle {
    pub transform: Mat4,
    pub visible: bool,
}

impl Default for Reticle {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            visible: false,
        }
    }
}

impl Reticle {
    /// Follow `pose`; returns whether a valid hit is available for placement.
    pub fn update(&mut self, pose: Option<Pose>) -> bool {
        match pose {
            Some(pose) => {
                self.visible = true;
                self.transform = pose.transform;
                true
            }
            None => {
                self.visible = false;
                false
            }
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
