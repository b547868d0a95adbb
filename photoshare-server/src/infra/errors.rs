use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{
    media::paths::PathError,
    templates::{self, NotFoundTemplate, RateLimitedTemplate},
};

pub type ServeResult<T> = Result<T, ServeError>;

#[derive(Debug, Error)]
pub enum ServeError {
    /// Missing file, unreadable directory or a path outside its root. The
    /// distinction is never shown to the client.
    #[error("not found")]
    NotFound,
    #[error("too many requests")]
    RateLimited,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServeError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match self {
            ServeError::NotFound => not_found_page(false),
            ServeError::RateLimited => {
                page(StatusCode::TOO_MANY_REQUESTS, &RateLimitedTemplate::default())
            }
            ServeError::Internal(message) => {
                error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    .into_response()
            }
        }
    }
}

/// The 404 view, with the navigation shown to signed-in visitors.
pub fn not_found_page(authenticated: bool) -> Response {
    let template = NotFoundTemplate {
        authenticated,
        notice: None,
    };
    page(StatusCode::NOT_FOUND, &template)
}

fn page<T: askama::Template>(status: StatusCode, template: &T) -> Response {
    match templates::render(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => {
            error!(error = %err, "error page failed to render");
            (status, Html(status.to_string())).into_response()
        }
    }
}

impl From<PathError> for ServeError {
    fn from(_: PathError) -> Self {
        Self::NotFound
    }
}

impl From<std::io::Error> for ServeError {
    fn from(_: std::io::Error) -> Self {
        Self::NotFound
    }
}

impl From<askama::Error> for ServeError {
    fn from(err: askama::Error) -> Self {
        Self::internal(format!("template rendering failed: {err}"))
    }
}

impl From<tokio::task::JoinError> for ServeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("blocking task failed: {err}"))
    }
}
