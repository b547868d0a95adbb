//! Resolution of client-supplied paths against a served root.
//!
//! A path is accepted only if it is relative, made of plain components, and
//! still lies under the root after symlinks are resolved.

use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is not valid UTF-8 once decoded")]
    Encoding,
    #[error("path contains a forbidden component")]
    Forbidden,
    #[error("path resolves outside its root")]
    Escapes,
    #[error("path does not exist")]
    Missing,
}

/// Percent-decode a path that the router has already decoded once.
pub fn decode(raw: &str) -> Result<String, PathError> {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|_| PathError::Encoding)
}

/// Lexically validate `decoded` as a relative path of plain components.
pub fn relative_path(decoded: &str) -> Result<PathBuf, PathError> {
    if decoded.contains(['\\', '\0']) {
        return Err(PathError::Forbidden);
    }

    let mut relative = PathBuf::new();
    for component in Path::new(decoded).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return Err(PathError::Forbidden),
        }
    }
    Ok(relative)
}

/// Like [`relative_path`] but exactly one component, for flat directories.
pub fn file_name(decoded: &str) -> Result<PathBuf, PathError> {
    let relative = relative_path(decoded)?;
    match relative.components().count() {
        1 => Ok(relative),
        _ => Err(PathError::Forbidden),
    }
}

/// Join `relative` onto `root` and confirm the canonical result stays inside
/// the canonical root.
pub async fn resolve_within(
    root: &Path,
    relative: &Path,
) -> Result<PathBuf, PathError> {
    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|_| PathError::Missing)?;
    let resolved = tokio::fs::canonicalize(root.join(relative))
        .await
        .map_err(|_| PathError::Missing)?;

    if resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(PathError::Escapes)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    async fn resolve(root: &Path, raw: &str) -> Result<PathBuf, PathError> {
        let relative = relative_path(&decode(raw)?)?;
        resolve_within(root, &relative).await
    }

    #[test]
    fn decodes_percent_sequences() {
        assert_eq!(decode("a%20b").unwrap(), "a b");
        assert_eq!(decode("100%").unwrap(), "100%");
        assert_eq!(decode("%FF"), Err(PathError::Encoding));
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert_eq!(relative_path("../etc"), Err(PathError::Forbidden));
        assert_eq!(relative_path("a/../../b"), Err(PathError::Forbidden));
        assert_eq!(relative_path("/etc/passwd"), Err(PathError::Forbidden));
        assert_eq!(relative_path("./a"), Err(PathError::Forbidden));
        assert_eq!(relative_path("a\\..\\b"), Err(PathError::Forbidden));
        assert_eq!(relative_path("a\0b"), Err(PathError::Forbidden));
        assert_eq!(relative_path("trip/day 1").unwrap(), Path::new("trip/day 1"));
    }

    #[test]
    fn file_name_allows_a_single_component() {
        assert_eq!(file_name("report.pdf").unwrap(), Path::new("report.pdf"));
        assert_eq!(file_name("nested/report.pdf"), Err(PathError::Forbidden));
        assert_eq!(file_name(""), Err(PathError::Forbidden));
    }

    #[tokio::test]
    async fn resolves_inside_root_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("media");
        fs::create_dir_all(root.join("trip")).unwrap();
        fs::write(root.join("trip/a.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        let found = resolve(&root, "trip/a.jpg").await.unwrap();
        assert!(found.ends_with("trip/a.jpg"));

        assert_eq!(resolve(&root, "trip/missing.jpg").await, Err(PathError::Missing));
        assert_eq!(resolve(&root, "../secret.txt").await, Err(PathError::Forbidden));
        assert_eq!(
            resolve(&root, "%2E%2E/secret.txt").await,
            Err(PathError::Forbidden)
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_cannot_escape() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("media");
        fs::create_dir_all(&root).unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("secret.txt"),
            root.join("link.txt"),
        )
        .unwrap();

        assert_eq!(resolve(&root, "link.txt").await, Err(PathError::Escapes));
    }
}
