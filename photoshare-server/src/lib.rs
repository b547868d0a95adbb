//! # Photoshare Server
//!
//! A small password-gated web front end over two directories on disk:
//!
//! - **Media browser**: top-level albums, paginated album listings and inline
//!   photo/video serving from the media root
//! - **Downloads**: a flat list of files offered as attachments
//! - **Authentication gate**: a single shared password, verified against an
//!   Argon2id hash, granting a signed one-day session cookie
//!
//! Everything is stateless on the server side: sessions, flash notices and
//! CSRF nonces all live in signed cookies.

pub mod auth;
pub mod downloads;
pub mod infra;
pub mod media;
pub mod routes;
pub mod templates;

pub use infra::app_state::AppState;
pub use infra::errors::{ServeError, ServeResult};
pub use routes::create_app;
