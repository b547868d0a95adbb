//! The login session, held entirely by the client in a signed cookie.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use photoshare_config::{SessionCookiePolicy, models::SameSitePolicy};
use serde::{Deserialize, Serialize};

use super::signing::Signer;
use crate::AppState;

pub const SESSION_COOKIE: &str = "photoshare_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub authenticated: bool,
    /// Unix seconds.
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

fn lifetime_secs(lifetime: Duration) -> i64 {
    i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX)
}

/// Seal an authenticated session that expires `lifetime` after `now`.
pub fn issue(signer: &Signer, now: DateTime<Utc>, lifetime: Duration) -> String {
    let payload = SessionPayload {
        authenticated: true,
        expires_at: now.timestamp().saturating_add(lifetime_secs(lifetime)),
    };
    // Serializing two plain fields cannot fail.
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    signer.seal(&json)
}

/// Interpret a cookie value. Anything tampered, unparseable or expired is
/// anonymous.
pub fn read(signer: &Signer, token: &str, now: DateTime<Utc>) -> SessionState {
    let Some(json) = signer.open(token) else {
        return SessionState::Anonymous;
    };
    match serde_json::from_slice::<SessionPayload>(&json) {
        Ok(payload)
            if payload.authenticated && now.timestamp() < payload.expires_at =>
        {
            SessionState::Authenticated
        }
        _ => SessionState::Anonymous,
    }
}

pub fn session_state(state: &AppState, jar: &CookieJar) -> SessionState {
    jar.get(SESSION_COOKIE)
        .map(|cookie| read(state.session_signer(), cookie.value(), Utc::now()))
        .unwrap_or_default()
}

pub(crate) fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    }
}

pub fn session_cookie(
    token: String,
    policy: &SessionCookiePolicy,
) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(policy.http_only)
        .secure(policy.secure)
        .same_site(same_site(policy.same_site))
        .max_age(cookie::time::Duration::seconds(lifetime_secs(
            policy.lifetime,
        )))
        .build()
}

/// Record a successful login on the jar.
pub fn start(state: &AppState, jar: CookieJar) -> CookieJar {
    let policy = &state.config().session_cookie;
    let token = issue(state.session_signer(), Utc::now(), policy.lifetime);
    jar.add(session_cookie(token, policy))
}

pub fn end(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_session_is_authenticated_until_expiry() {
        let signer = Signer::new(b"session key");
        let token = issue(&signer, at(1_000), Duration::from_secs(86_400));

        assert_eq!(read(&signer, &token, at(1_000)), SessionState::Authenticated);
        assert_eq!(
            read(&signer, &token, at(1_000 + 86_399)),
            SessionState::Authenticated
        );
        assert_eq!(
            read(&signer, &token, at(1_000 + 86_400)),
            SessionState::Anonymous
        );
    }

    #[test]
    fn tampered_payload_is_anonymous() {
        let signer = Signer::new(b"session key");
        let forged_json = serde_json::to_vec(&SessionPayload {
            authenticated: true,
            expires_at: i64::MAX,
        })
        .unwrap();
        let honest = issue(&signer, at(0), Duration::from_secs(60));
        let (_, signature) = honest.split_once('.').unwrap();
        let forged = format!(
            "{}.{signature}",
            base64::Engine::encode(
                &base64::engine::general_purpose::URL_SAFE_NO_PAD,
                forged_json
            )
        );

        assert_eq!(read(&signer, &forged, at(10)), SessionState::Anonymous);
    }

    #[test]
    fn other_key_and_unauthenticated_payloads_are_anonymous() {
        let signer = Signer::new(b"session key");
        let token = issue(&signer, at(0), Duration::from_secs(60));
        assert_eq!(
            read(&Signer::new(b"rotated"), &token, at(1)),
            SessionState::Anonymous
        );

        let unauthenticated = signer.seal(
            &serde_json::to_vec(&SessionPayload {
                authenticated: false,
                expires_at: i64::MAX,
            })
            .unwrap(),
        );
        assert_eq!(read(&signer, &unauthenticated, at(1)), SessionState::Anonymous);
        assert_eq!(read(&signer, "garbage", at(1)), SessionState::Anonymous);
    }

    #[test]
    fn cookie_carries_the_fixed_policy() {
        let cookie =
            session_cookie("token".into(), &SessionCookiePolicy::default());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(cookie::time::Duration::seconds(86_400))
        );
    }
}
