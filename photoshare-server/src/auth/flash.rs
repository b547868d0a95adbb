//! One-shot notices carried across a redirect in a signed cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use super::{session::same_site, signing::Signer};
use crate::AppState;

pub const FLASH_COOKIE: &str = "photoshare_flash";

pub const LOGIN_REQUIRED: &str = "You need to log in to access this page.";
pub const LOGIN_FAILED: &str = "Login Failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Error,
    Info,
}

impl FlashCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashCategory::Error => "error",
            FlashCategory::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Info,
            message: message.into(),
        }
    }
}

pub fn encode(signer: &Signer, flash: &Flash) -> String {
    let json = serde_json::to_vec(flash).unwrap_or_default();
    signer.seal(&json)
}

pub fn decode(signer: &Signer, token: &str) -> Option<Flash> {
    serde_json::from_slice(&signer.open(token)?).ok()
}

/// Queue `flash` for the next rendered page.
pub fn push(state: &AppState, jar: CookieJar, flash: &Flash) -> CookieJar {
    let policy = &state.config().session_cookie;
    let cookie = Cookie::build((
        FLASH_COOKIE,
        encode(state.session_signer(), flash),
    ))
    .path("/")
    .http_only(true)
    .secure(policy.secure)
    .same_site(same_site(policy.same_site))
    .build();
    jar.add(cookie)
}

/// Remove any pending notice from the jar and return it. A cookie that fails
/// verification is dropped silently.
pub fn take(state: &AppState, jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = decode(state.session_signer(), cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, flash)
}
