//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM repositories, page caches, session tokens, password hashing and
//! rate limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory cache only
//! - `rate-limit` - Rate limiting via governor
//! - `redis` - Redis-backed page cache

pub mod auth;
pub mod cache;
pub mod database;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{
    DatabaseConfig, SqlCommentRepository, SqlFollowRepository, SqlGroupRepository,
    SqlPostRepository, SqlUserRepository, connect,
};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
