//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_infra::{DatabaseConfig, JwtConfig};

/// Database used when `DATABASE_URL` is not set.
pub const FALLBACK_DATABASE_URL: &str = "sqlite://quill.db?mode=rwc";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub session: JwtConfig,
    /// How long a rendered index page is served from cache.
    pub index_cache_ttl: Duration,
    pub redis_url: Option<String>,
    pub auth_rate_limit: AuthRateLimit,
    pub password_hashing: PasswordHashing,
}

/// Quota for account form submissions, per client address.
#[derive(Debug, Clone, Copy)]
pub struct AuthRateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHashing {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        // The argon2 crate's defaults.
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let (database_url, fallback) = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => (url, false),
            _ => (FALLBACK_DATABASE_URL.to_string(), true),
        };
        if fallback {
            tracing::warn!(
                url = FALLBACK_DATABASE_URL,
                "DATABASE_URL not set. Using local SQLite database."
            );
        }

        let mut database = DatabaseConfig::new(database_url);
        database.max_connections = parse_or("DB_MAX_CONNECTIONS", 20);
        database.min_connections = parse_or("DB_MIN_CONNECTIONS", 2);
        database.sqlx_logging = flag("DB_SQLX_LOGGING");

        let defaults = JwtConfig::default();
        let session = JwtConfig {
            secret: env::var("SESSION_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parse_or("SESSION_TTL_HOURS", defaults.expiration_hours),
            issuer: env::var("SESSION_ISSUER").unwrap_or(defaults.issuer),
        };

        let hashing = PasswordHashing::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            // A fresh fallback database has no schema yet.
            run_migrations: fallback || flag("RUN_MIGRATIONS"),
            session,
            index_cache_ttl: Duration::from_secs(parse_or("INDEX_CACHE_SECONDS", 20)),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            auth_rate_limit: AuthRateLimit {
                max_requests: parse_or("AUTH_RATE_LIMIT_MAX_REQUESTS", 10),
                window: Duration::from_secs(parse_or("AUTH_RATE_LIMIT_WINDOW_SECS", 60)),
            },
            password_hashing: PasswordHashing {
                memory_kib: parse_or("ARGON2_MEMORY_KIB", hashing.memory_kib),
                iterations: parse_or("ARGON2_ITERATIONS", hashing.iterations),
            },
        }
    }

    /// Configuration for tests and local experiments: in-memory SQLite,
    /// migrations on, cheap password hashing.
    pub fn for_testing() -> Self {
        let mut database = DatabaseConfig::new("sqlite::memory:");
        database.max_connections = 1;

        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database,
            run_migrations: true,
            session: JwtConfig {
                secret: "test-session-secret".to_string(),
                ..JwtConfig::default()
            },
            index_cache_ttl: Duration::from_secs(20),
            redis_url: None,
            auth_rate_limit: AuthRateLimit {
                max_requests: 1000,
                window: Duration::from_secs(60),
            },
            password_hashing: PasswordHashing {
                memory_kib: 1024,
                iterations: 1,
            },
        }
    }
}
