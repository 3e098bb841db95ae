/// Edge length of the placed marker cube in metres.
pub const CUBE_SIZE: f32 = 0.1;

pub const CUBE_COLOR: u32 = 0xff0055;
pub const CUBE_METALNESS: f32 = 0.2;
pub const CUBE_ROUGHNESS: f32 = 0.75;

/// Prefix of the label given to every placed cube.
pub const PLACED_LABEL_PREFIX: &str = "placed-cube";

/// Reference space types requested from the XR session, in order of preference.
pub const VIEWER_SPACE: &str = "viewer";
pub const LOCAL_FLOOR_SPACE: &str = "local-floor";
pub const LOCAL_SPACE: &str = "local";

/// Session mode and features requested when entering AR.
pub const IMMERSIVE_AR_MODE: &str = "immersive-ar";
pub const REQUIRED_FEATURES: &[&str] = &["hit-test"];
pub const OPTIONAL_FEATURES: &[&str] = &["dom-overlay"];
