use crate::{
    constants::{
        ENV_CSRF_SECRET_KEY, ENV_PASSWORD_HASH, ENV_SESSION_SECRET_KEY,
        MIN_SECRET_KEY_LEN,
    },
    models::{AuthConfig, Config, SecretValue},
};

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Inspect a composed configuration for settings that are fine for local
/// testing but wrong for a real deployment. Nothing here is fatal: the server
/// still starts, and an unset password hash simply locks everyone out.
pub fn apply_guard_rails(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    check_secrets(&config.auth, &mut warnings);

    if !config.auth.password_hash.is_set() {
        warnings.push_with_hint(
            format!("{ENV_PASSWORD_HASH} is not set; every login will fail"),
            "Run `photoshare-secrets <admin_password>` and export the printed PASSWORD_HASH",
        );
    }

    for (label, path) in [
        ("media root", config.media_root()),
        ("downloads root", config.downloads_root()),
    ] {
        if !path.is_dir() {
            warnings.push(format!(
                "{label} {} does not exist or is not a directory",
                path.display()
            ));
        }
    }

    if config.dev_mode {
        warnings.push(
            "DEV_MODE is enabled; session cookies are still marked Secure and need HTTPS or a localhost exception",
        );
    }

    warnings
}

fn check_secrets(auth: &AuthConfig, warnings: &mut ConfigWarnings) {
    if auth.is_default_session_key() {
        warnings.push_with_hint(
            format!(
                "{ENV_SESSION_SECRET_KEY} not set; using the local development default"
            ),
            "Sessions signed with the default key can be forged; generate one with `photoshare-secrets`",
        );
    } else {
        check_length(ENV_SESSION_SECRET_KEY, &auth.session_key, warnings);
    }

    if auth.is_default_csrf_key() {
        warnings.push_with_hint(
            format!(
                "{ENV_CSRF_SECRET_KEY} not set; using the local development default"
            ),
            "Generate one with `photoshare-secrets`",
        );
    } else {
        check_length(ENV_CSRF_SECRET_KEY, &auth.csrf_key, warnings);
    }
}

fn check_length(
    field: &str,
    secret: &SecretValue,
    warnings: &mut ConfigWarnings,
) {
    if secret.len() < MIN_SECRET_KEY_LEN {
        warnings.push(format!(
            "{field} is shorter than {MIN_SECRET_KEY_LEN} characters"
        ));
    }
}
