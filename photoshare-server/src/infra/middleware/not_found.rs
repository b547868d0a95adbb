//! Session-aware 404 pages.
//!
//! Errors are rendered without request context, so the 404 view comes out
//! anonymous. This layer re-renders it for signed-in sessions so the
//! navigation stays in place.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{AppState, auth::session, infra::errors::not_found_page};

pub async fn render_not_found(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::NOT_FOUND
        || !session::session_state(&state, &jar).is_authenticated()
    {
        return response;
    }
    not_found_page(true)
}
