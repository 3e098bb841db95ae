pub const START_LABEL: &str = "Start AR";
pub const STOP_LABEL: &str = "Stop AR";
pub const PLACE_LABEL: &str = "Place Object";
pub const PLACE_IDLE_LABEL: &str = "Start AR to Place";

pub const CHECKING_SUPPORT_TEXT: &str = "Checking AR support...";
pub const ENTER_AR_TEXT: &str = "Enter AR and move your device to find a surface.";
pub const SEARCHING_TEXT: &str = "Move your device to detect a surface.";
pub const READY_TO_PLACE_TEXT: &str = "Tap the screen or press the button to place a cube.";

/// Page element ids used by the browser build.
pub const APP_MOUNT_ID: &str = "app";
pub const CANVAS_ID: &str = "xr-canvas";
pub const UI_CONTAINER_ID: &str = "ui-container";
pub const INSTRUCTIONS_ID: &str = "ui-instructions";
pub const START_BUTTON_ID: &str = "start-button";
pub const PLACE_BUTTON_ID: &str = "place-button";

/// Class set on the start button while AR is unavailable.
pub const SUPPORT_WARNING_CLASS: &str = "ar-support-warning";
