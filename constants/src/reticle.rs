/// Inner radius of the reticle ring in metres.
pub const RETICLE_INNER_RADIUS: f32 = 0.08;

/// Outer radius of the reticle ring in metres.
pub const RETICLE_OUTER_RADIUS: f32 = 0.1;

/// Ring tessellation.
pub const RETICLE_SEGMENTS: u32 = 32;

pub const RETICLE_COLOR: u32 = 0x2ea3ff;
pub const RETICLE_OPACITY: f32 = 0.8;

/// The ring geometry is authored in the XY plane and laid flat on the hit surface.
pub const RETICLE_TILT_X: f32 = -std::f32::consts::FRAC_PI_2;
