use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::debug;

use crate::{
    AppState,
    infra::{
        errors::ServeResult,
        files::{self, Disposition},
    },
};

/// GET /download/{filename}/ - serve as an attachment.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ServeResult<Response> {
    let resolved = state
        .downloads()
        .get_download(&filename)
        .await
        .inspect_err(|err| debug!(%filename, error = %err, "download lookup failed"))?;

    files::stream_file(&resolved, Disposition::Attachment(&filename)).await
}
