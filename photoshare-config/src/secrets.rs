//! Deployment secret generation for the `photoshare-secrets` binary.

use std::fmt;

use thiserror::Error;

use crate::{
    constants::{ENV_CSRF_SECRET_KEY, ENV_PASSWORD_HASH, ENV_SESSION_SECRET_KEY},
    crypto::{self, PasswordCrypto, PasswordCryptoError},
    models::{SecretValue, escape_compose_dollars},
};

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error(transparent)]
    Crypto(#[from] PasswordCryptoError),
}

/// How the generated lines will be consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Plain `KEY=value`, suitable for `.env` files and shell exports.
    #[default]
    Env,
    /// `$` doubled so docker-compose does not treat the hash as interpolation.
    Compose,
}

/// The three values an operator injects into the server environment.
pub struct SecretBundle {
    pub session_key: SecretValue,
    pub csrf_key: SecretValue,
    pub password_hash: SecretValue,
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle").finish_non_exhaustive()
    }
}

impl SecretBundle {
    /// Two independent random signing keys plus a salted hash of `password`.
    pub fn generate(
        crypto: &PasswordCrypto,
        password: &str,
    ) -> Result<Self, SecretsError> {
        Ok(Self {
            session_key: SecretValue::new(crypto::generate_secret_key()?),
            csrf_key: SecretValue::new(crypto::generate_secret_key()?),
            password_hash: SecretValue::new(crypto.hash_password(password)?),
        })
    }

    /// `KEY=value` pairs in the order they are printed.
    pub fn lines(&self, style: OutputStyle) -> Vec<String> {
        let hash = match style {
            OutputStyle::Env => self.password_hash.expose().to_string(),
            OutputStyle::Compose => {
                escape_compose_dollars(self.password_hash.expose())
            }
        };

        vec![
            format!("{ENV_SESSION_SECRET_KEY}={}", self.session_key.expose()),
            format!("{ENV_CSRF_SECRET_KEY}={}", self.csrf_key.expose()),
            format!("{ENV_PASSWORD_HASH}={hash}"),
        ]
    }
}
