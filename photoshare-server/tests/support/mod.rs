// Shared by several test binaries; not every helper is used in each.
#![allow(dead_code)]

use std::{fs, path::Path};

use axum::http::StatusCode;
use axum_test::TestServer;
use cookie::Cookie;
use photoshare_config::{
    AuthConfig, Config, ConfigMetadata, PasswordCrypto, PasswordHashSetting,
    PathsConfig, ServerConfig, SessionCookiePolicy,
};
use photoshare_server::{AppState, create_app};
use tempfile::TempDir;

pub const PASSWORD: &str = "correct horse battery staple";
pub const SESSION_COOKIE: &str = "photoshare_session";
pub const CSRF_COOKIE: &str = "photoshare_csrf";
pub const FLASH_COOKIE: &str = "photoshare_flash";

pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

fn fast_crypto() -> PasswordCrypto {
    let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 params");
    PasswordCrypto::with_params(params)
}

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::write(path, contents).expect("write fixture file");
}

/// Static root layout:
///
/// ```text
/// favicon.ico
/// secret.txt
/// media/album/cover.png, media/album/2023/inside2023.jpg
/// media/trip 2024/img00.jpg .. img11.jpg, clip.mp4, day 1/
/// downloads/report.pdf, downloads/my file.zip
/// ```
fn populate(root: &Path) {
    write(&root.join("favicon.ico"), b"\x00\x00\x01\x00icon");
    write(&root.join("secret.txt"), b"top secret");
    write(&root.join("media/album/cover.png"), b"png bytes");
    write(&root.join("media/album/2023/inside2023.jpg"), b"jpeg bytes");

    let trip = root.join("media/trip 2024");
    for index in 0..12 {
        write(&trip.join(format!("img{index:02}.jpg")), b"jpeg bytes");
    }
    write(&trip.join("clip.mp4"), b"mp4 bytes");
    fs::create_dir_all(trip.join("day 1")).expect("create subdirectory");

    write(&root.join("downloads/report.pdf"), b"%PDF-1.4");
    write(&root.join("downloads/my file.zip"), b"PK");
}

impl TestApp {
    pub fn new() -> Self {
        let hash = fast_crypto().hash_password(PASSWORD).expect("hash password");
        Self::with_password_hash(PasswordHashSetting::from_raw(Some(&hash)))
    }

    /// An app whose PASSWORD_HASH is unset.
    pub fn without_password() -> Self {
        Self::with_password_hash(PasswordHashSetting::Unset)
    }

    pub fn with_password_hash(password_hash: PasswordHashSetting) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let static_root = dir.path().join("static");
        populate(&static_root);

        let crypto = fast_crypto();

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            paths: PathsConfig::under_static_root(&static_root),
            auth: AuthConfig::new(
                "integration-session-key-0123456789abcdef",
                "integration-csrf-key-0123456789abcdef",
                password_hash,
            ),
            session_cookie: SessionCookiePolicy::default(),
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        };

        let server = TestServer::new(create_app(AppState::new(config, crypto)))
            .expect("build test server");
        Self { server, dir }
    }

    /// Fetch the login page and return the CSRF nonce cookie with a token
    /// minted for it.
    pub async fn login_form(&self) -> (Cookie<'static>, String) {
        let response = self.server.get("/").await;
        response.assert_status_ok();
        let nonce = response.cookie(CSRF_COOKIE);
        (nonce, csrf_token(&response.text()))
    }

    /// Log in with the right password and return the session cookie.
    pub async fn sign_in(&self) -> Cookie<'static> {
        let (nonce, token) = self.login_form().await;
        let response = self
            .server
            .post("/")
            .add_cookie(nonce)
            .form(&[("password", PASSWORD), ("csrf_token", token.as_str())])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(SESSION_COOKIE)
    }
}

/// Pull the hidden `csrf_token` value out of a rendered login page.
pub fn csrf_token(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("login page carries a CSRF token")
        + marker.len();
    html[start..]
        .split('"')
        .next()
        .expect("token value is quoted")
        .to_string()
}
