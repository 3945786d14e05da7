//! Middleware and request extractors.

pub mod auth;
pub mod error;
pub mod error_pages;
pub mod rate_limit;
