//! Rendering for rate-limited responses.
//!
//! Limiting itself happens upstream (a reverse proxy or an inner layer); this
//! module only replaces the body of any 429 with the friendly error page.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::infra::errors::ServeError;

/// `axum::middleware::map_response` hook: swap any 429 for the error view,
/// preserving `Retry-After`.
pub async fn render_too_many_requests(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let retry_after = response.headers().get(header::RETRY_AFTER).cloned();
    debug!(retry_after = ?retry_after, "rendering rate limit page");

    let mut rendered = ServeError::RateLimited.into_response();
    if let Some(value) = retry_after {
        rendered.headers_mut().insert(header::RETRY_AFTER, value);
    }
    rendered
}
