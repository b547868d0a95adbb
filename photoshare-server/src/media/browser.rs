//! Read-only views over the media root.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::paths::{self, PathError};

pub const PER_PAGE: usize = 10;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const VIDEO_EXTENSIONS: [&str; 2] = ["mov", "mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

pub fn classify(name: &str) -> MediaKind {
    let Some(extension) = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return MediaKind::Other;
    };

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// Whether `name` has one of the photo or video extensions, ignoring case.
pub fn is_media_file(name: &str) -> bool {
    classify(name) != MediaKind::Other
}

/// One page of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPage {
    /// Decoded path relative to the media root.
    pub directory: String,
    /// Only populated on page 1.
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
    pub current_page: u32,
    pub total_pages: usize,
}

/// Slice `files` to 1-based `page`. Returns the slice and the page count.
pub fn paginate(files: &[String], page: u32) -> (&[String], usize) {
    let total_pages = files.len().div_ceil(PER_PAGE);
    let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
    let start = index.saturating_mul(PER_PAGE).min(files.len());
    let end = start.saturating_add(PER_PAGE).min(files.len());
    (&files[start..end], total_pages)
}

#[derive(Debug, Default)]
struct Entries {
    dirs: Vec<String>,
    files: Vec<String>,
}

/// Sorted subdirectory and file names directly under `dir`. Symlinks are
/// classified by their target; names that are not UTF-8 are skipped.
async fn read_entries(dir: &Path) -> io::Result<Entries> {
    let mut entries = Entries::default();
    let mut reader = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 entry");
            continue;
        };
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_dir() => entries.dirs.push(name),
            Ok(meta) if meta.is_file() => entries.files.push(name),
            Ok(_) => {}
            Err(err) => {
                debug!(path = %entry.path().display(), error = %err, "skipping unreadable entry")
            }
        }
    }

    entries.dirs.sort();
    entries.files.sort();
    Ok(entries)
}

/// Browses albums under a single media root.
#[derive(Debug, Clone)]
pub struct MediaBrowser {
    root: PathBuf,
}

impl MediaBrowser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the immediate subdirectories of the media root, sorted. A
    /// missing root lists nothing.
    pub async fn list_top_level(&self) -> Vec<String> {
        match read_entries(&self.root).await {
            Ok(entries) => entries.dirs,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "media root is not readable");
                Vec::new()
            }
        }
    }

    /// One page of `raw_path`, a router-decoded path relative to the root.
    pub async fn list_directory(
        &self,
        raw_path: &str,
        page: u32,
    ) -> Result<DirectoryPage, PathError> {
        if page == 0 {
            return Err(PathError::Missing);
        }

        let directory = paths::decode(raw_path)?;
        let relative = paths::relative_path(&directory)?;
        if relative.as_os_str().is_empty() {
            return Err(PathError::Missing);
        }

        let resolved = paths::resolve_within(&self.root, &relative).await?;
        let entries = read_entries(&resolved)
            .await
            .map_err(|_| PathError::Missing)?;

        let (files, total_pages) = paginate(&entries.files, page);
        let subdirs = if page == 1 { entries.dirs.clone() } else { Vec::new() };

        Ok(DirectoryPage {
            directory: relative.to_string_lossy().into_owned(),
            subdirs,
            files: files.to_vec(),
            current_page: page,
            total_pages,
        })
    }

    /// Locate a single file for inline serving.
    pub async fn get_photo(
        &self,
        raw_directory: &str,
        raw_filename: &str,
    ) -> Result<PathBuf, PathError> {
        let directory = paths::relative_path(&paths::decode(raw_directory)?)?;
        let filename = paths::file_name(&paths::decode(raw_filename)?)?;
        if directory.as_os_str().is_empty() {
            return Err(PathError::Missing);
        }

        let resolved =
            paths::resolve_within(&self.root, &directory.join(filename)).await?;
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

/// Percent-encode each segment of `path` twice: once for the router and once
/// for the extra decode the media handlers apply.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::encode(&urlencoding::encode(segment)).into_owned()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Link to one page of a directory.
///
/// A nested directory whose last segment is a number would be read back as a
/// page of its parent, so its links always carry the page explicitly.
pub fn directory_href(directory: &str, page: u32) -> String {
    let ends_in_number = directory
        .rsplit_once('/')
        .is_some_and(|(_, last)| last.parse::<u32>().is_ok());
    match page {
        0 | 1 if !ends_in_number => {
            format!("/directory/{}/", encode_path(directory))
        }
        page => format!(
            "/directory/{}/{}/",
            encode_path(directory),
            page.max(1)
        ),
    }
}

pub fn photo_href(directory: &str, filename: &str) -> String {
    format!("/photo/{}/{}", encode_path(directory), encode_path(filename))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("photo{i:02}.jpg")).collect()
    }

    #[test]
    fn media_extensions_ignore_case() {
        assert!(is_media_file("IMG_0001.JPG"));
        assert!(is_media_file("clip.Mp4"));
        assert!(is_media_file("pic.jpeg"));
        assert!(!is_media_file("notes.txt"));
        assert!(!is_media_file("jpg"));
        assert!(!is_media_file("archive.png.zip"));
        assert_eq!(classify("movie.MOV"), MediaKind::Video);
        assert_eq!(classify("a.png"), MediaKind::Image);
    }

    #[test]
    fn paginates_twenty_five_files() {
        let files = names(25);

        let (first, total) = paginate(&files, 1);
        assert_eq!(total, 3);
        assert_eq!(first, &files[0..10]);

        let (last, _) = paginate(&files, 3);
        assert_eq!(last, &files[20..25]);

        let (beyond, _) = paginate(&files, 4);
        assert!(beyond.is_empty());

        let (huge, _) = paginate(&files, u32::MAX);
        assert!(huge.is_empty());
    }

    #[test]
    fn paginates_empty_and_exact_lists() {
        let (page, total) = paginate(&[], 1);
        assert!(page.is_empty());
        assert_eq!(total, 0);

        let files = names(10);
        let (page, total) = paginate(&files, 1);
        assert_eq!(page.len(), 10);
        assert_eq!(total, 1);
    }

    #[test]
    fn hrefs_are_double_encoded_per_segment() {
        assert_eq!(directory_href("Summer 2024", 1), "/directory/Summer%25202024/");
        assert_eq!(directory_href("a/b", 2), "/directory/a/b/2/");
        assert_eq!(photo_href("a/b", "100%.jpg"), "/photo/a/b/100%2525.jpg");
    }

    #[test]
    fn numeric_subdirectory_links_name_their_page() {
        assert_eq!(directory_href("album/2023", 1), "/directory/album/2023/1/");
        assert_eq!(directory_href("album/2023", 0), "/directory/album/2023/1/");
        assert_eq!(directory_href("album/2023", 3), "/directory/album/2023/3/");
        assert_eq!(directory_href("2023", 1), "/directory/2023/");
        assert_eq!(directory_href("album/v2", 1), "/directory/album/v2/");

        let (directory, page) =
            crate::media::handlers::split_page("album/2023/1/");
        assert_eq!((directory, page), ("album/2023", 1));
    }

    fn fixture() -> (tempfile::TempDir, MediaBrowser) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("media");
        fs::create_dir_all(root.join("trip/day1")).unwrap();
        fs::create_dir_all(root.join("album")).unwrap();
        fs::write(root.join("loose.jpg"), b"x").unwrap();
        for name in names(12) {
            fs::write(root.join("trip").join(name), b"x").unwrap();
        }
        let browser = MediaBrowser::new(root);
        (dir, browser)
    }

    #[tokio::test]
    async fn top_level_lists_sorted_directories_only() {
        let (_dir, browser) = fixture();
        assert_eq!(browser.list_top_level().await, vec!["album", "trip"]);

        let missing = MediaBrowser::new(browser.root().join("nope"));
        assert!(missing.list_top_level().await.is_empty());
    }

    #[tokio::test]
    async fn subdirectories_only_on_first_page() {
        let (_dir, browser) = fixture();

        let first = browser.list_directory("trip", 1).await.unwrap();
        assert_eq!(first.subdirs, vec!["day1"]);
        assert_eq!(first.files.len(), 10);
        assert_eq!(first.total_pages, 2);

        let second = browser.list_directory("trip", 2).await.unwrap();
        assert!(second.subdirs.is_empty());
        assert_eq!(second.files, vec!["photo10.jpg", "photo11.jpg"]);
    }

    #[tokio::test]
    async fn listing_rejects_missing_and_escaping_paths() {
        let (_dir, browser) = fixture();
        assert_eq!(
            browser.list_directory("nope", 1).await,
            Err(PathError::Missing)
        );
        assert_eq!(
            browser.list_directory("../", 1).await,
            Err(PathError::Forbidden)
        );
        assert_eq!(
            browser.list_directory("loose.jpg", 1).await,
            Err(PathError::Missing)
        );
        assert_eq!(browser.list_directory("trip", 0).await, Err(PathError::Missing));
    }

    #[tokio::test]
    async fn get_photo_resolves_files_inside_directories() {
        let (_dir, browser) = fixture();
        let found = browser.get_photo("trip", "photo03.jpg").await.unwrap();
        assert!(found.ends_with("trip/photo03.jpg"));

        assert_eq!(
            browser.get_photo("trip", "missing.jpg").await,
            Err(PathError::Missing)
        );
        assert_eq!(
            browser.get_photo("trip", "day1").await,
            Err(PathError::Missing)
        );
        assert_eq!(
            browser.get_photo("trip/..", "loose.jpg").await,
            Err(PathError::Forbidden)
        );
        assert_eq!(
            browser.get_photo("trip", "..%2F..%2Fsecret").await,
            Err(PathError::Forbidden)
        );
    }
}
