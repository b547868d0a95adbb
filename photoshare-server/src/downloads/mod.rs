//! Flat directory of files offered as attachments.

pub mod handlers;

use std::path::PathBuf;

use tracing::warn;

use crate::media::paths::{self, PathError};

#[derive(Debug, Clone)]
pub struct DownloadShelf {
    root: PathBuf,
}

impl DownloadShelf {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sorted names of the regular files directly under the downloads root.
    pub async fn list_downloads(&self) -> Vec<String> {
        let mut reader = match tokio::fs::read_dir(&self.root).await {
            Ok(reader) => reader,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "downloads root is not readable");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        while let Ok(Some(entry)) = reader.next_entry().await {
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_file());
            if is_file && let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        names
    }

    /// Resolve a single plain file name under the root.
    pub async fn get_download(&self, filename: &str) -> Result<PathBuf, PathError> {
        let name = paths::file_name(filename)?;
        let resolved = paths::resolve_within(&self.root, &name).await?;
        if tokio::fs::metadata(&resolved)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            Ok(resolved)
        } else {
            Err(PathError::Missing)
        }
    }
}

pub fn download_href(filename: &str) -> String {
    format!("/download/{}/", urlencoding::encode(filename))
}
