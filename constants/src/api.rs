/// Port the placement API listens on when no base URL override is configured.
pub const DEFAULT_API_PORT: u16 = 5000;

/// Hostname used when the current host cannot be determined.
pub const DEFAULT_API_HOST: &str = "localhost";

/// Environment variable holding an explicit API base URL.
pub const API_BASE_URL_ENV: &str = "AR_PLACEMENT_API_BASE_URL";

/// Hosted tunnel domain suffix; served pages on it usually cannot reach the derived URL.
pub const TUNNEL_DOMAIN_SUFFIX: &str = ".loca.lt";

/// Route accepting placement transforms.
pub const SAVE_ROUTE: &str = "/api/save";

/// Health route.
pub const PING_ROUTE: &str = "/api/ping";

/// Service banner returned from `/`.
pub const SERVICE_BANNER: &str = "WebXR Object Placement API";

/// Confirmation message attached to a successful save.
pub const SAVE_CONFIRMATION: &str = "Placement received";
