pub mod csrf;
pub mod not_found;
pub mod rate_limit;
