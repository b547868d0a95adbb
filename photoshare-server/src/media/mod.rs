pub mod browser;
pub mod handlers;
pub mod paths;
