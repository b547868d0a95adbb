use std::{fmt, sync::Arc};

use photoshare_config::{Config, PasswordCrypto};

use crate::{auth::signing::Signer, downloads::DownloadShelf, media::browser::MediaBrowser};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    crypto: Arc<PasswordCrypto>,
    session_signer: Arc<Signer>,
    csrf_signer: Arc<Signer>,
    media: Arc<MediaBrowser>,
    downloads: Arc<DownloadShelf>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Config, crypto: PasswordCrypto) -> Self {
        let session_signer = Signer::new(config.auth.session_key.as_bytes());
        let csrf_signer = Signer::new(config.auth.csrf_key.as_bytes());
        let media = MediaBrowser::new(config.media_root());
        let downloads = DownloadShelf::new(config.downloads_root());

        Self {
            config: Arc::new(config),
            crypto: Arc::new(crypto),
            session_signer: Arc::new(session_signer),
            csrf_signer: Arc::new(csrf_signer),
            media: Arc::new(media),
            downloads: Arc::new(downloads),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Owned handle for moving into a blocking task.
    pub fn crypto(&self) -> Arc<PasswordCrypto> {
        Arc::clone(&self.crypto)
    }

    /// Signs session and flash cookies.
    pub fn session_signer(&self) -> &Signer {
        &self.session_signer
    }

    /// Signs login-form CSRF tokens.
    pub fn csrf_signer(&self) -> &Signer {
        &self.csrf_signer
    }

    pub fn media(&self) -> &MediaBrowser {
        &self.media
    }

    pub fn downloads(&self) -> &DownloadShelf {
        &self.downloads
    }
}
