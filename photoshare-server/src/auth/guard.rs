use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use super::{
    flash::{self, Flash, LOGIN_REQUIRED},
    session,
};
use crate::AppState;

/// Lets authenticated sessions through. Everyone else is sent to `/` with a
/// notice; the requested path is not remembered.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if session::session_state(&state, &jar).is_authenticated() {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "unauthenticated request redirected");
    let jar = flash::push(&state, jar, &Flash::error(LOGIN_REQUIRED));
    (jar, Redirect::to("/")).into_response()
}
