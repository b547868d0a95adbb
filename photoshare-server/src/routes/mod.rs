use axum::{
    Router,
    extract::State,
    middleware::{from_fn_with_state, map_response},
    response::Response,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    auth::{guard::require_login, handlers as auth_handlers},
    downloads::handlers::download_handler,
    infra::{
        errors::{ServeError, ServeResult},
        files::{self, Disposition},
        middleware::{
            not_found::render_not_found, rate_limit::render_too_many_requests,
        },
    },
    media::handlers::{directory_handler, photo_handler},
};

const FAVICON_CONTENT_TYPE: &str = "image/vnd.microsoft.icon";

/// Build the full application router.
pub fn create_app(state: AppState) -> Router {
    // Routes behind the login guard
    let protected = Router::new()
        .route("/photo/{*path}", get(photo_handler))
        .route("/directory/{*path}", get(directory_handler))
        .route("/download/{filename}", get(download_handler))
        .route("/download/{filename}/", get(download_handler))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/", get(auth_handlers::index).post(auth_handlers::login))
        .route("/logout", get(auth_handlers::logout))
        .route("/favicon.ico", get(favicon_handler))
        .merge(protected)
        .fallback(not_found_handler)
        // Outer to inner: tracing, 429 rendering, session-aware 404s
        .layer(from_fn_with_state(state.clone(), render_not_found))
        .layer(map_response(render_too_many_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn favicon_handler(State(state): State<AppState>) -> ServeResult<Response> {
    let path = state.config().static_root().join("favicon.ico");
    files::stream_file_as(&path, FAVICON_CONTENT_TYPE, Disposition::Inline).await
}

async fn not_found_handler() -> ServeError {
    ServeError::NotFound
}
