/// Appended to the unsupported messages; iOS hides WebXR behind feature flags.
pub const IOS_SUPPORT_HINT: &str = "On iOS 17+, enable Settings → Safari → Advanced → Feature Flags → WebXR + WebXR Hit Test, then relaunch Safari.";

pub const INSECURE_CONTEXT_MESSAGE: &str =
    "WebXR needs a secure context. Serve the app over HTTPS or through a tunnel.";
pub const INSECURE_CONTEXT_LABEL: &str = "Secure context required";

pub const MISSING_XR_MESSAGE: &str =
    "This browser does not expose WebXR. Use Safari 17+ or Chrome (Android).";
pub const MISSING_XR_LABEL: &str = "Browser missing WebXR";

pub const AR_DISABLED_MESSAGE: &str = "Immersive AR is disabled.";
pub const AR_DISABLED_LABEL: &str = "Enable WebXR features";

pub const SUPPORTED_MESSAGE: &str = "Move your device to detect a surface.";
