use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::constants::SECRET_KEY_BYTES;

const SALT_LENGTH: usize = password_hash::Salt::RECOMMENDED_LENGTH;

/// Argon2id password hashing for the single admin account.
///
/// Hashes are PHC strings carrying their own salt and parameters, so a hash
/// produced with one parameter set still verifies after the defaults change.
#[derive(Clone)]
pub struct PasswordCrypto {
    argon2: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum PasswordCryptoError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error("operating system randomness unavailable: {0}")]
    Randomness(String),
}

impl From<password_hash::Error> for PasswordCryptoError {
    fn from(err: password_hash::Error) -> Self {
        PasswordCryptoError::PasswordHash(err.to_string())
    }
}

impl fmt::Debug for PasswordCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCrypto").finish_non_exhaustive()
    }
}

impl PasswordCrypto {
    /// ~64 MiB and 3 passes.
    const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 1;

    /// Build a helper with the default Argon2id parameters.
    pub fn new() -> Result<Self, PasswordCryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Self::DEFAULT_MEMORY_KIB)
            .t_cost(Self::DEFAULT_ITERATIONS)
            .p_cost(Self::DEFAULT_PARALLELISM)
            .output_len(32)
            .build()
            .map_err(|err| {
                PasswordCryptoError::InvalidArgon2Params(err.to_string())
            })?;
        Ok(Self::with_params(params))
    }

    /// Build a helper with caller-specified parameters (cheap ones keep tests
    /// fast).
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
        }
    }

    /// Hash a password with a fresh random salt.
    pub fn hash_password(
        &self,
        password: &str,
    ) -> Result<String, PasswordCryptoError> {
        let salt_bytes = random_bytes::<SALT_LENGTH>()?;
        let salt = SaltString::encode_b64(&salt_bytes)?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    }

    /// Check a candidate password against a stored hash.
    ///
    /// Argon2 PHC strings and bcrypt (`$2a$`, `$2b$`, `$2y$`) hashes are both
    /// accepted. A mismatch is `Ok(false)`; only a hash that cannot be parsed
    /// is an error. The comparison itself is constant-time.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PasswordCryptoError> {
        if is_bcrypt(password_hash) {
            return bcrypt::verify(password, password_hash)
                .map_err(|_| PasswordCryptoError::MalformedHash);
        }

        let parsed = PasswordHash::new(password_hash)
            .map_err(|_| PasswordCryptoError::MalformedHash)?;
        let candidate = Zeroizing::new(password.as_bytes().to_vec());
        Ok(self.argon2.verify_password(&candidate, &parsed).is_ok())
    }
}

fn is_bcrypt(hash: &str) -> bool {
    let id = hash
        .strip_prefix('$')
        .and_then(|rest| rest.split('$').next());
    matches!(id, Some("2a" | "2b" | "2y"))
}

/// Fill a buffer from the operating system's CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], PasswordCryptoError>
{
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| PasswordCryptoError::Randomness(err.to_string()))?;
    Ok(bytes)
}

/// A base64-encoded random signing key.
pub fn generate_secret_key() -> Result<String, PasswordCryptoError> {
    let bytes = Zeroizing::new(random_bytes::<SECRET_KEY_BYTES>()?);
    Ok(STANDARD.encode(bytes.as_slice()))
}

#[cfg(test)]
pub(crate) fn fast_crypto() -> PasswordCrypto {
    let params = ParamsBuilder::new()
        .m_cost(8)
        .t_cost(1)
        .p_cost(1)
        .build()
        .unwrap();
    PasswordCrypto::with_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_passwords_and_verifies() {
        let crypto = fast_crypto();
        let hash = crypto.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password("correct horse", &hash).unwrap());
        assert!(!crypto.verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let crypto = fast_crypto();
        let first = crypto.hash_password("same").unwrap();
        let second = crypto.hash_password("same").unwrap();
        assert_ne!(first, second);
        assert!(crypto.verify_password("same", &first).unwrap());
        assert!(crypto.verify_password("same", &second).unwrap());
    }

    #[test]
    fn verification_uses_parameters_embedded_in_hash() {
        let hash = fast_crypto().hash_password("portable").unwrap();
        let default = PasswordCrypto::new().unwrap();
        assert!(default.verify_password("portable", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let crypto = fast_crypto();
        assert!(matches!(
            crypto.verify_password("anything", "not-a-phc-string"),
            Err(PasswordCryptoError::MalformedHash)
        ));
    }

    #[test]
    fn verifies_bcrypt_hashes() {
        let crypto = fast_crypto();
        let hash = bcrypt::hash("legacy secret", 4).unwrap();
        assert!(hash.starts_with("$2b$"));
        assert!(crypto.verify_password("legacy secret", &hash).unwrap());
        assert!(!crypto.verify_password("wrong", &hash).unwrap());

        let legacy_2a = hash.replacen("$2b$", "$2a$", 1);
        assert!(crypto.verify_password("legacy secret", &legacy_2a).unwrap());
    }

    #[test]
    fn compose_escaped_bcrypt_hash_verifies() {
        use crate::models::{PasswordHashSetting, escape_compose_dollars};

        let crypto = fast_crypto();
        let hash = bcrypt::hash("legacy secret", 4).unwrap();
        let escaped = escape_compose_dollars(&hash);
        assert!(escaped.starts_with("$$2b$$"));

        let setting = PasswordHashSetting::from_raw(Some(&escaped));
        let stored = setting.as_phc().unwrap();
        assert_eq!(stored, hash);
        assert!(crypto.verify_password("legacy secret", stored).unwrap());
    }

    #[test]
    fn malformed_bcrypt_hash_is_an_error() {
        let crypto = fast_crypto();
        assert!(matches!(
            crypto.verify_password("anything", "$2b$04$tooshort"),
            Err(PasswordCryptoError::MalformedHash)
        ));
    }

    #[test]
    fn secret_keys_are_random_base64() {
        let first = generate_secret_key().unwrap();
        let second = generate_secret_key().unwrap();
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(STANDARD.decode(&first).unwrap().len(), SECRET_KEY_BYTES);
    }
}
