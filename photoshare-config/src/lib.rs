//! Shared configuration library for Photoshare.
//!
//! This crate owns everything a deployment has to get right before the server
//! starts: loading the immutable [`Config`] from the environment (and an
//! optional TOML file), surfacing guard-rail warnings about development
//! defaults, and generating the secrets the `photoshare-secrets` binary prints
//! for injection into the environment.

pub mod constants;
pub mod crypto;
pub mod loader;
pub mod models;
pub mod secrets;
pub mod util;
pub mod validation;

pub use crypto::{PasswordCrypto, PasswordCryptoError};
pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    AuthConfig, Config, ConfigMetadata, PasswordHashSetting, PathsConfig,
    SecretValue, ServerConfig, SessionCookiePolicy,
};
pub use validation::{ConfigWarning, ConfigWarnings};
