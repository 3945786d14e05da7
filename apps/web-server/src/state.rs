//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{DbConn, DbErr};

use quill_core::ports::{
    AuthError, Cache, CommentRepository, FollowRepository, GroupRepository, PasswordService,
    PostRepository, RateLimiter, TokenService, UserRepository,
};
use quill_infra::{
    Argon2PasswordService, InMemoryCache, JwtTokenService, SqlCommentRepository,
    SqlFollowRepository, SqlGroupRepository, SqlPostRepository, SqlUserRepository,
};

use crate::config::AppConfig;
use crate::templates::Templates;

/// Failures that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Template error: {0}")]
    Templates(#[from] tera::Error),

    #[error("Password hashing setup failed: {0}")]
    Passwords(#[from] AuthError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbConn>,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Limiter for account form submissions; `None` disables limiting.
    pub auth_limiter: Option<Arc<dyn RateLimiter>>,
    pub templates: Arc<Templates>,
    pub index_cache_ttl: Duration,
}

impl AppState {
    /// Connect to the database, apply migrations if asked to, and pick a
    /// cache backend.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let db = quill_infra::connect(&config.database).await?;

        if config.run_migrations {
            tracing::info!("Applying pending migrations");
            Migrator::up(&db, None).await?;
        }

        let cache = build_cache(config).await;
        Self::from_parts(Arc::new(db), cache, config)
    }

    /// Assemble the state around an existing connection and cache.
    pub fn from_parts(
        db: Arc<DbConn>,
        cache: Arc<dyn Cache>,
        config: &AppConfig,
    ) -> Result<Self, StartupError> {
        let passwords = Argon2PasswordService::with_params(
            config.password_hashing.memory_kib,
            config.password_hashing.iterations,
        )?;

        let state = Self {
            users: Arc::new(SqlUserRepository::new(Arc::clone(&db))),
            groups: Arc::new(SqlGroupRepository::new(Arc::clone(&db))),
            posts: Arc::new(SqlPostRepository::new(Arc::clone(&db))),
            comments: Arc::new(SqlCommentRepository::new(Arc::clone(&db))),
            follows: Arc::new(SqlFollowRepository::new(Arc::clone(&db))),
            db,
            cache,
            tokens: Arc::new(JwtTokenService::new(config.session.clone())),
            passwords: Arc::new(passwords),
            auth_limiter: build_auth_limiter(config),
            templates: Arc::new(Templates::new()?),
            index_cache_ttl: config.index_cache_ttl,
        };

        tracing::info!(
            index_cache_secs = config.index_cache_ttl.as_secs(),
            rate_limited = state.auth_limiter.is_some(),
            "Application state initialized"
        );
        Ok(state)
    }
}

#[cfg(feature = "redis")]
async fn build_cache(config: &AppConfig) -> Arc<dyn Cache> {
    use quill_infra::{RedisCache, RedisConfig};

    if let Some(url) = &config.redis_url {
        match RedisCache::new(RedisConfig::new(url.clone())).await {
            Ok(cache) => return Arc::new(cache),
            Err(e) => {
                tracing::error!(error = %e, "Redis unavailable. Using in-memory cache.");
            }
        }
    }

    Arc::new(InMemoryCache::new())
}

#[cfg(not(feature = "redis"))]
async fn build_cache(config: &AppConfig) -> Arc<dyn Cache> {
    if config.redis_url.is_some() {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled. Using in-memory cache.");
    }

    Arc::new(InMemoryCache::new())
}

#[cfg(feature = "rate-limit")]
fn build_auth_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

    Some(Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: config.auth_rate_limit.max_requests,
        window: config.auth_rate_limit.window,
    })))
}

#[cfg(not(feature = "rate-limit"))]
fn build_auth_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    None
}
