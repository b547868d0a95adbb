//! Single-password authentication: signed session cookies, one-shot flash
//! notices, the guard that protects media and download routes, and the login
//! and logout handlers.

pub mod flash;
pub mod guard;
pub mod handlers;
pub mod session;
pub mod signing;
