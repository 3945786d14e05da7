//! # Quill Web Server
//!
//! Server-rendered blogging site: feeds, posts, groups, comments and
//! follows, built on Actix-web and Tera.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod templates;
pub mod urls;
pub mod views;
