//! Configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The Durable Store is addressed with discrete `PG_*` variables composed
//! into connect options; the rate limiter's budget and window are design
//! constants, not configuration.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Durable store (`PostgreSQL`) connection settings.
    pub postgres: PostgresConfig,
    /// Fast counter store (Redis) connection settings.
    pub redis: RedisConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// `PostgreSQL` configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// User.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database name.
    pub database: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl PostgresConfig {
    /// Build sqlx connect options from the discrete settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Metrics listener host (for Prometheus scraping).
    pub metrics_host: String,
    /// Metrics listener port.
    pub metrics_port: u16,
    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            postgres: PostgresConfig {
                host: env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("PG_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5432),
                user: env::var("PG_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: env::var("PG_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
                database: env::var("PG_DATABASE").unwrap_or_else(|_| "seckill".to_string()),
                max_connections: env::var("PG_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
                metrics_host: env::var("METRICS_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                metrics_port: env::var("METRICS_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(9090),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            },
        }
    }
}
