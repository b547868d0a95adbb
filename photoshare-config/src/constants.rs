use std::time::Duration;

pub const ENV_SESSION_SECRET_KEY: &str = "SESSION_SECRET_KEY";
pub const ENV_CSRF_SECRET_KEY: &str = "CSRF_SECRET_KEY";
pub const ENV_PASSWORD_HASH: &str = "PASSWORD_HASH";

pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_MEDIA_ROOT: &str = "MEDIA_ROOT";
pub const ENV_DOWNLOADS_ROOT: &str = "DOWNLOADS_ROOT";
pub const ENV_STATIC_ROOT: &str = "STATIC_ROOT";
pub const ENV_DEV_MODE: &str = "DEV_MODE";
pub const ENV_CONFIG_PATH: &str = "PHOTOSHARE_CONFIG";

/// Keys printed by `photoshare-secrets`, in output order.
pub const MANAGED_KEYS: [&str; 3] =
    [ENV_SESSION_SECRET_KEY, ENV_CSRF_SECRET_KEY, ENV_PASSWORD_HASH];

/// Development-only fallbacks. Anything running with these is not a real
/// deployment and the guard rails say so at startup.
pub const DEFAULT_SESSION_SECRET_KEY: &str = "a_secret_key_for_local";
pub const DEFAULT_CSRF_SECRET_KEY: &str = "a_csrf_secret_key_for_local";

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_STATIC_ROOT: &str = "./static";
pub const DEFAULT_MEDIA_DIR: &str = "media";
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";

/// Random bytes behind each generated signing key (64 base64 characters).
pub const SECRET_KEY_BYTES: usize = 48;

/// Minimum key length below which startup warns about weak signing keys.
pub const MIN_SECRET_KEY_LEN: usize = 32;

pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);
