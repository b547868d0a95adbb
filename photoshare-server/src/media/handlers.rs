use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::{
    AppState,
    auth::flash,
    infra::{
        errors::{ServeError, ServeResult},
        files::{self, Disposition},
    },
    templates::{self, DirectoryTemplate},
};

/// Split `/directory/...` into the directory path and an optional trailing
/// page number. A numeric last segment is a page only when something precedes
/// it.
pub fn split_page(path: &str) -> (&str, u32) {
    let trimmed = path.trim_end_matches('/');
    if let Some((directory, last)) = trimmed.rsplit_once('/')
        && !directory.is_empty()
        && let Ok(page) = last.parse::<u32>()
        && page >= 1
    {
        return (directory, page);
    }
    (trimmed, 1)
}

/// GET /photo/{*path} - the last segment is the file name.
pub async fn photo_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ServeResult<Response> {
    let (directory, filename) =
        path.rsplit_once('/').ok_or(ServeError::NotFound)?;

    let resolved = state
        .media()
        .get_photo(directory, filename)
        .await
        .inspect_err(|err| debug!(%path, error = %err, "photo lookup failed"))?;

    files::stream_file(&resolved, Disposition::Inline).await
}

/// GET /directory/{*path} - paginated album listing.
pub async fn directory_handler(
    State(state): State<AppState>,
    uri: Uri,
    jar: CookieJar,
    Path(path): Path<String>,
) -> ServeResult<Response> {
    if !uri.path().ends_with('/') {
        return Ok(Redirect::permanent(&format!("{}/", uri.path())).into_response());
    }

    let (directory, page) = split_page(&path);
    let listing = state
        .media()
        .list_directory(directory, page)
        .await
        .inspect_err(|err| debug!(%path, error = %err, "directory lookup failed"))?;

    let (jar, notice) = flash::take(&state, jar);
    let html =
        templates::render(&DirectoryTemplate::new(listing, notice.map(Into::into)))?;
    Ok((jar, html).into_response())
}
