//! # Quill Core
//!
//! The domain layer of the Quill blogging platform: posts, groups, comments,
//! the follow graph, feed scopes and pagination, plus the ports that
//! infrastructure implements. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{RepoError, ValidationErrors};
