use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{constants::*, util::parse_bool_var};

/// Raw configuration as defined in a TOML file.
///
/// Secrets are absent: the session key, CSRF key and password
/// hash only ever come from the environment.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub paths: FilePathsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_root: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub media_root: Option<PathBuf>,
    pub downloads_root: Option<PathBuf>,
    pub static_root: Option<PathBuf>,
    pub dev_mode: Option<bool>,
    pub session_secret_key: Option<String>,
    pub csrf_secret_key: Option<String>,
    pub password_hash: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var(ENV_CONFIG_PATH).map(PathBuf::from),
            server_host: non_empty_var(ENV_SERVER_HOST),
            server_port: non_empty_var(ENV_SERVER_PORT)
                .and_then(|s| s.parse().ok()),
            media_root: non_empty_var(ENV_MEDIA_ROOT).map(PathBuf::from),
            downloads_root: non_empty_var(ENV_DOWNLOADS_ROOT)
                .map(PathBuf::from),
            static_root: non_empty_var(ENV_STATIC_ROOT).map(PathBuf::from),
            dev_mode: parse_bool_var(ENV_DEV_MODE),
            session_secret_key: non_empty_var(ENV_SESSION_SECRET_KEY),
            csrf_secret_key: non_empty_var(ENV_CSRF_SECRET_KEY),
            // Blank and missing are folded together by PasswordHashSetting.
            password_hash: std::env::var(ENV_PASSWORD_HASH).ok(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
