use std::fmt;

use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::{
    flash::{self, Flash, LOGIN_FAILED},
    session,
};
use crate::{
    AppState,
    infra::{errors::ServeResult, middleware::csrf},
    templates::{self, DownloadsTemplate, IndexTemplate, LoginTemplate, Notice},
};

pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const LOGGED_OUT: &str = "You have been logged out.";

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub downloads: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("password", &"[redacted]")
            .field("csrf_token", &self.csrf_token)
            .finish()
    }
}

/// First hop of `X-Forwarded-For`, for log lines only.
fn client_address(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn login_page(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    notice: Option<Notice>,
    error: Option<&str>,
) -> ServeResult<Response> {
    let (jar, token) = csrf::prepare(state.csrf_signer(), jar);
    let mut template = LoginTemplate::new(token, notice);
    if let Some(error) = error {
        template = template.with_error(error);
    }
    let html = templates::render(&template)?;
    Ok((status, jar, html).into_response())
}

/// GET / - landing page when signed in (or the downloads list with
/// `?downloads`), otherwise the login form.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<IndexQuery>,
) -> ServeResult<Response> {
    let (jar, notice) = flash::take(&state, jar);
    let notice = notice.map(Notice::from);

    if !session::session_state(&state, &jar).is_authenticated() {
        return login_page(&state, jar, StatusCode::OK, notice, None);
    }

    let html = if query.downloads.is_some() {
        let files = state.downloads().list_downloads().await;
        templates::render(&DownloadsTemplate::new(files, notice))?
    } else {
        let directories = state.media().list_top_level().await;
        templates::render(&IndexTemplate::new(directories, notice))?
    };
    Ok((jar, html).into_response())
}

/// POST / - check the CSRF token, then the password.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ServeResult<Response> {
    if session::session_state(&state, &jar).is_authenticated() {
        return Ok((jar, Redirect::to("/")).into_response());
    }

    let client = client_address(&headers);
    let LoginForm {
        password,
        csrf_token,
    } = form;
    let password = Zeroizing::new(password);

    let nonce = csrf::extract_nonce(&jar);
    if let Err(err) = csrf::verify_token(
        state.csrf_signer(),
        nonce.as_deref(),
        &csrf_token,
        Utc::now(),
    ) {
        warn!(%client, reason = %err, "login rejected by CSRF check");
        return login_page(
            &state,
            jar,
            StatusCode::BAD_REQUEST,
            None,
            Some(&err.to_string()),
        );
    }

    if password.is_empty() {
        return login_page(&state, jar, StatusCode::OK, None, Some(PASSWORD_REQUIRED));
    }

    if verify_password(&state, password).await? {
        info!(%client, "login succeeded");
        let jar = session::start(&state, jar);
        return Ok((jar, Redirect::to("/")).into_response());
    }

    info!(%client, "login failed");
    let notice = Notice::from(Flash::error(LOGIN_FAILED));
    login_page(&state, jar, StatusCode::OK, Some(notice), None)
}

/// Argon2 verification on the blocking pool. An unset or unusable hash fails
/// like a wrong password.
async fn verify_password(
    state: &AppState,
    password: Zeroizing<String>,
) -> ServeResult<bool> {
    let Some(hash) = state.config().auth.password_hash.as_phc() else {
        warn!("PASSWORD_HASH is not configured; rejecting login");
        return Ok(false);
    };
    let hash = Zeroizing::new(hash.to_string());
    let crypto = state.crypto();

    let outcome = tokio::task::spawn_blocking(move || {
        crypto.verify_password(&password, &hash)
    })
    .await?;

    Ok(outcome.unwrap_or_else(|err| {
        warn!(error = %err, "configured password hash is unusable; rejecting login");
        false
    }))
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = session::end(jar);
    let jar = flash::push(&state, jar, &Flash::info(LOGGED_OUT));
    (jar, Redirect::to("/")).into_response()
}
