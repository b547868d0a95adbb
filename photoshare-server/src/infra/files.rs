//! Streaming file responses.

use std::path::Path;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

use super::errors::{ServeError, ServeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<'a> {
    Inline,
    Attachment(&'a str),
}

/// Stream `path` with a content type guessed from its extension.
pub async fn stream_file(
    path: &Path,
    disposition: Disposition<'_>,
) -> ServeResult<Response> {
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    stream_file_as(path, content_type.essence_str(), disposition).await
}

/// Stream `path` with an explicit content type.
pub async fn stream_file_as(
    path: &Path,
    content_type: &str,
    disposition: Disposition<'_>,
) -> ServeResult<Response> {
    let file = tokio::fs::File::open(path).await?;
    let meta = file.metadata().await?;
    if !meta.is_file() {
        return Err(ServeError::NotFound);
    }

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, meta.len().to_string());

    if let Disposition::Attachment(filename) = disposition {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            attachment_header(filename)?,
        );
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|err| ServeError::internal(format!("failed to build file response: {err}")))
}

/// `attachment; filename="..."`, adding an RFC 5987 `filename*` when the
/// name is not plain ASCII.
pub fn attachment_header(filename: &str) -> ServeResult<HeaderValue> {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let value = if fallback == filename {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    };

    HeaderValue::from_str(&value)
        .map_err(|err| ServeError::internal(format!("invalid Content-Disposition: {err}")))
}
