//! Double-submit CSRF protection for the login form.
//!
//! A random nonce lives in an HttpOnly cookie; the form carries
//! `issued_at "." HMAC(csrf key, nonce "." issued_at)`. A token is valid only
//! alongside the nonce it was minted for and for [`CSRF_TOKEN_TTL_SECS`].

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::{RngCore, rng};
use thiserror::Error;

use crate::auth::signing::Signer;

pub const CSRF_COOKIE: &str = "photoshare_csrf";
pub const CSRF_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,
    #[error("The CSRF token is invalid.")]
    Invalid,
    #[error("The CSRF token has expired.")]
    Expired,
}

/// Generates a cryptographically secure 32-byte nonce
pub fn generate_nonce() -> String {
    let mut nonce_bytes = [0u8; 32];
    rng().fill_bytes(&mut nonce_bytes);
    URL_SAFE_NO_PAD.encode(nonce_bytes)
}

pub fn create_csrf_cookie(nonce: String) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, nonce))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(cookie::time::Duration::seconds(CSRF_TOKEN_TTL_SECS))
        .build()
}

pub fn extract_nonce(jar: &CookieJar) -> Option<String> {
    jar.get(CSRF_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|nonce| !nonce.is_empty())
}

fn signed_material(nonce: &str, issued_at: i64) -> String {
    format!("{nonce}.{issued_at}")
}

pub fn issue_token(signer: &Signer, nonce: &str, now: DateTime<Utc>) -> String {
    let issued_at = now.timestamp();
    let signature = signer.sign(signed_material(nonce, issued_at).as_bytes());
    format!("{issued_at}.{signature}")
}

pub fn verify_token(
    signer: &Signer,
    nonce: Option<&str>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<(), CsrfError> {
    let nonce = nonce.ok_or(CsrfError::Missing)?;
    if token.is_empty() {
        return Err(CsrfError::Missing);
    }

    let (issued_at, signature) =
        token.split_once('.').ok_or(CsrfError::Invalid)?;
    let issued_at: i64 = issued_at.parse().map_err(|_| CsrfError::Invalid)?;

    if !signer.verify(signed_material(nonce, issued_at).as_bytes(), signature)
    {
        return Err(CsrfError::Invalid);
    }

    let age = now.timestamp() - issued_at;
    if !(0..=CSRF_TOKEN_TTL_SECS).contains(&age) {
        return Err(CsrfError::Expired);
    }
    Ok(())
}

/// Reuse the visitor's nonce or mint a fresh one, and return a form token
/// bound to it.
pub fn prepare(signer: &Signer, jar: CookieJar) -> (CookieJar, String) {
    let (jar, nonce) = match extract_nonce(&jar) {
        Some(nonce) => (jar, nonce),
        None => {
            let nonce = generate_nonce();
            (jar.add(create_csrf_cookie(nonce.clone())), nonce)
        }
    };
    let token = issue_token(signer, &nonce, Utc::now());
    (jar, token)
}
