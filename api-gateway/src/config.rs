// ==============================================================================
// config.rs - Gateway Configuration
// ==============================================================================
// Description: Environment-driven settings for the news and auth gateway
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
//
// Every setting has a default except NEWSAPI_KEY. A missing key is not a
// startup failure: news endpoints answer with a configuration error instead.
//
// ==============================================================================

use secrecy::Secret;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
/// Two weeks
const DEFAULT_SESSION_TTL_SECS: u64 = 1_209_600;
const DEFAULT_LOGIN_ATTEMPTS_PER_MINUTE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Upstream provider key; never logged or returned to clients
    pub newsapi_key: Option<Secret<String>>,

    /// Upstream base URL (overridable for tests and proxies)
    pub newsapi_base_url: String,

    /// Per-call upstream timeout
    pub upstream_timeout: Duration,

    /// Browser origins allowed to call the API with credentials
    pub cors_allowed_origins: Vec<String>,

    /// Postgres identity store when set, in-memory otherwise
    pub database_url: Option<String>,

    /// Redis session store when set, in-memory otherwise
    pub redis_url: Option<String>,

    pub session_ttl: Duration,

    /// Sets the Secure flag on session and CSRF cookies
    pub cookie_secure: bool,

    pub login_attempts_per_minute: u32,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("bind_addr", &self.bind_addr)
            .field("newsapi_key", &self.newsapi_key.as_ref().map(|_| "[REDACTED]"))
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("login_attempts_per_minute", &self.login_attempts_per_minute)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), || {
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
        })?;

        let upstream_timeout = Duration::from_secs(parse_or(
            "UPSTREAM_TIMEOUT_SECS",
            get("UPSTREAM_TIMEOUT_SECS"),
            || DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?);

        let session_ttl = Duration::from_secs(parse_or(
            "SESSION_TTL_SECS",
            get("SESSION_TTL_SECS"),
            || DEFAULT_SESSION_TTL_SECS,
        )?);

        let cookie_secure = parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), || false)?;

        let login_attempts_per_minute = parse_or(
            "LOGIN_ATTEMPTS_PER_MINUTE",
            get("LOGIN_ATTEMPTS_PER_MINUTE"),
            || DEFAULT_LOGIN_ATTEMPTS_PER_MINUTE,
        )?;
        if login_attempts_per_minute == 0 {
            return Err(ConfigError::Invalid {
                name: "LOGIN_ATTEMPTS_PER_MINUTE",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            bind_addr,
            newsapi_key: get("NEWSAPI_KEY").map(Secret::new),
            newsapi_base_url: get("NEWSAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NEWSAPI_BASE_URL.to_string()),
            upstream_timeout,
            cors_allowed_origins,
            database_url: get("DATABASE_URL"),
            redis_url: get("REDIS_URL"),
            session_ttl,
            cookie_secure,
            login_attempts_per_minute,
        })
    }
}

fn parse_or<T, D>(name: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> T,
{
    match raw {
        None => Ok(default()),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
