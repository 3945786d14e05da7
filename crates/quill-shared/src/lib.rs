//! # Quill Shared
//!
//! Wire types shared by the web layer: submitted form payloads, query
//! parameters and JSON responses.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, HealthResponse};
