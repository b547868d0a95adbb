pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use self::error::ConfigLoadError;
use crate::{
    constants::*,
    models::{
        AuthConfig, Config, ConfigMetadata, PasswordHashSetting, PathsConfig,
        ServerConfig, SessionCookiePolicy,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["photoshare.toml", "config/photoshare.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Builds the process [`Config`] from `.env`, the environment and an optional
/// TOML file. Environment values win over file values, which win over
/// defaults.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        Ok(compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        ))
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // An explicitly named file must exist; a default location is optional.
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .into_iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        debug!(path = %path.display(), "configuration file parsed");
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge the gathered sources into a [`Config`] and run the guard rails.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> ConfigLoad {
    let FileConfig {
        server: file_server,
        paths: file_paths,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(DEFAULT_SERVER_PORT),
    };

    let static_root = env
        .static_root
        .or(file_paths.static_root)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_ROOT));
    let defaults = PathsConfig::under_static_root(static_root);
    let paths = PathsConfig {
        media_root: env
            .media_root
            .or(file_paths.media_root)
            .unwrap_or(defaults.media_root),
        downloads_root: env
            .downloads_root
            .or(file_paths.downloads_root)
            .unwrap_or(defaults.downloads_root),
        static_root: defaults.static_root,
    };

    let auth = AuthConfig::new(
        env.session_secret_key
            .unwrap_or_else(|| DEFAULT_SESSION_SECRET_KEY.to_string()),
        env.csrf_secret_key
            .unwrap_or_else(|| DEFAULT_CSRF_SECRET_KEY.to_string()),
        PasswordHashSetting::from_raw(env.password_hash.as_deref()),
    );

    let config = Config {
        server,
        paths,
        auth,
        session_cookie: SessionCookiePolicy::default(),
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        metadata,
    };

    let warnings = validation::apply_guard_rails(&config);
    ConfigLoad { config, warnings }
}
