//! Askama views. Every page extends `base.html`, which reads `authenticated`
//! and `notice`, so each template struct carries both.

use askama::Template;
use axum::response::Html;

use crate::{
    auth::flash::Flash,
    downloads,
    infra::errors::ServeResult,
    media::browser::{self, DirectoryPage, MediaKind},
};

pub fn render<T: Template>(template: &T) -> ServeResult<Html<String>> {
    Ok(Html(template.render()?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub category: &'static str,
    pub message: String,
}

impl From<Flash> for Notice {
    fn from(flash: Flash) -> Self {
        Self {
            category: flash.category.as_str(),
            message: flash.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub href: String,
    pub is_image: bool,
    pub is_video: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub csrf_token: String,
}

impl LoginTemplate {
    pub fn new(csrf_token: String, notice: Option<Notice>) -> Self {
        Self {
            authenticated: false,
            notice,
            error: None,
            csrf_token,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
    pub directories: Vec<Link>,
}

impl IndexTemplate {
    pub fn new(directories: Vec<String>, notice: Option<Notice>) -> Self {
        let directories = directories
            .into_iter()
            .map(|name| Link {
                href: browser::directory_href(&name, 1),
                label: name,
            })
            .collect();
        Self {
            authenticated: true,
            notice,
            directories,
        }
    }
}

#[derive(Debug, Template)]
#[template(path = "downloads.html")]
pub struct DownloadsTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
    pub files: Vec<Link>,
}

impl DownloadsTemplate {
    pub fn new(files: Vec<String>, notice: Option<Notice>) -> Self {
        let files = files
            .into_iter()
            .map(|name| Link {
                href: downloads::download_href(&name),
                label: name,
            })
            .collect();
        Self {
            authenticated: true,
            notice,
            files,
        }
    }
}

#[derive(Debug, Template)]
#[template(path = "directory.html")]
pub struct DirectoryTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
    pub directory: String,
    pub subdirs: Vec<Link>,
    pub files: Vec<FileEntry>,
    pub pages: Vec<PageLink>,
    pub current_page: u32,
    pub total_pages: usize,
}

impl DirectoryTemplate {
    pub fn new(page: DirectoryPage, notice: Option<Notice>) -> Self {
        let DirectoryPage {
            directory,
            subdirs,
            files,
            current_page,
            total_pages,
        } = page;

        let subdirs = subdirs
            .into_iter()
            .map(|name| {
                let path = format!("{directory}/{name}");
                Link {
                    href: browser::directory_href(&path, 1),
                    label: name,
                }
            })
            .collect();

        let files = files
            .into_iter()
            .map(|name| {
                let kind = browser::classify(&name);
                FileEntry {
                    href: browser::photo_href(&directory, &name),
                    is_image: kind == MediaKind::Image,
                    is_video: kind == MediaKind::Video,
                    name,
                }
            })
            .collect();

        let pages = (1..=u32::try_from(total_pages).unwrap_or(u32::MAX))
            .map(|number| PageLink {
                number,
                href: browser::directory_href(&directory, number),
                current: number == current_page,
            })
            .collect();

        Self {
            authenticated: true,
            notice,
            directory,
            subdirs,
            files,
            pages,
            current_page,
            total_pages,
        }
    }
}

#[derive(Debug, Default, Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default, Template)]
#[template(path = "error.html")]
pub struct RateLimitedTemplate {
    pub authenticated: bool,
    pub notice: Option<Notice>,
}
