pub mod sources;

use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use zeroize::Zeroizing;

use crate::constants::{
    DEFAULT_CSRF_SECRET_KEY, DEFAULT_SESSION_SECRET_KEY, SESSION_LIFETIME,
};

/// Immutable process configuration. Built once by
/// [`ConfigLoader`](crate::ConfigLoader) and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub auth: AuthConfig,
    pub session_cookie: SessionCookiePolicy,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn media_root(&self) -> &Path {
        &self.paths.media_root
    }

    pub fn downloads_root(&self) -> &Path {
        &self.paths.downloads_root
    }

    pub fn static_root(&self) -> &Path {
        &self.paths.static_root
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Filesystem roots served by the application. None of these directories are
/// owned by the server; they are supplied by the deployment.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub media_root: PathBuf,
    pub downloads_root: PathBuf,
    /// Holds `favicon.ico`.
    pub static_root: PathBuf,
}

impl PathsConfig {
    /// Lay out `media/` and `downloads/` underneath a single static root.
    pub fn under_static_root(static_root: impl Into<PathBuf>) -> Self {
        let static_root = static_root.into();
        Self {
            media_root: static_root.join(crate::constants::DEFAULT_MEDIA_DIR),
            downloads_root: static_root
                .join(crate::constants::DEFAULT_DOWNLOADS_DIR),
            static_root,
        }
    }
}

/// A secret string that never shows up in `Debug` output and is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Zeroizing<String>);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([redacted])")
    }
}

/// The single account's password hash as handed to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashSetting {
    /// Nothing configured. Every login attempt fails.
    Unset,
    /// A PHC-formatted hash string, already unescaped.
    Configured(SecretValue),
}

impl PasswordHashSetting {
    /// Interpret a raw environment value.
    ///
    /// Surrounding whitespace is trimmed first, so a value that is blank
    /// after trimming counts as unset. Every `$$` in what remains is then
    /// collapsed back to `$`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Self::Configured(SecretValue::new(
                unescape_compose_dollars(value),
            )),
            None => Self::Unset,
        }
    }

    pub fn as_phc(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Configured(hash) => Some(hash.expose()),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

/// Undo the `$` doubling docker compose requires inside interpolated values:
/// every `$$` becomes `$`.
pub fn unescape_compose_dollars(raw: &str) -> String {
    raw.replace("$$", "$")
}

/// Inverse of [`unescape_compose_dollars`], used when printing a hash meant to
/// be pasted into a compose file.
pub fn escape_compose_dollars(raw: &str) -> String {
    raw.replace('$', "$$")
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_key: SecretValue,
    pub csrf_key: SecretValue,
    pub password_hash: PasswordHashSetting,
}

impl AuthConfig {
    pub fn new(
        session_key: impl Into<String>,
        csrf_key: impl Into<String>,
        password_hash: PasswordHashSetting,
    ) -> Self {
        Self {
            session_key: SecretValue::new(session_key),
            csrf_key: SecretValue::new(csrf_key),
            password_hash,
        }
    }

    pub fn is_default_session_key(&self) -> bool {
        self.session_key.expose() == DEFAULT_SESSION_SECRET_KEY
    }

    pub fn is_default_csrf_key(&self) -> bool {
        self.csrf_key.expose() == DEFAULT_CSRF_SECRET_KEY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// Attributes applied to the session cookie. Fixed for every deployment.
#[derive(Debug, Clone)]
pub struct SessionCookiePolicy {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    pub lifetime: Duration,
}

impl Default for SessionCookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            lifetime: SESSION_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
