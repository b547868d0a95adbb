use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer for client-held tokens.
///
/// A sealed token has the form `base64url(payload) "." base64url(tag)`.
pub struct Signer {
    key: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

impl Signer {
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: Zeroizing::new(key.to_vec()),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key)
            .expect("HMAC-SHA-256 accepts keys of any size")
    }

    /// Base64url-encoded tag over `payload`.
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(payload);
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of `signature` against `payload`.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(tag) = URL_SAFE_NO_PAD.decode(signature) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(payload);
        mac.verify_slice(&tag).is_ok()
    }

    pub fn seal(&self, payload: &[u8]) -> String {
        format!("{}.{}", URL_SAFE_NO_PAD.encode(payload), self.sign(payload))
    }

    /// The payload of a sealed token, or `None` if it was altered or signed
    /// with another key.
    pub fn open(&self, token: &str) -> Option<Vec<u8>> {
        let (encoded, signature) = token.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        self.verify(&payload, signature).then_some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_tokens_open_with_the_same_key() {
        let signer = Signer::new(b"first key");
        let token = signer.seal(b"{\"a\":1}");
        assert_eq!(signer.open(&token).as_deref(), Some(&b"{\"a\":1}"[..]));
    }

    #[test]
    fn other_keys_and_edits_are_rejected() {
        let signer = Signer::new(b"first key");
        let token = signer.seal(b"payload");

        assert!(Signer::new(b"second key").open(&token).is_none());

        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{signature}", URL_SAFE_NO_PAD.encode(b"payloaf"));
        assert!(signer.open(&forged).is_none());

        assert!(signer.open("no-separator").is_none());
        assert!(signer.open("!!!.???").is_none());
    }

    #[test]
    fn verify_rejects_truncated_tags() {
        let signer = Signer::new(b"k");
        let tag = signer.sign(b"data");
        assert!(signer.verify(b"data", &tag));
        assert!(!signer.verify(b"data", &tag[..tag.len() - 2]));
    }
}
