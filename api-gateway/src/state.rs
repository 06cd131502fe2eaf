// ==============================================================================
// state.rs - Application State Management
// ==============================================================================
// Description: Shared application state for the news and auth gateway
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::auth::{
    IdentityStore, LoginThrottle, MemoryIdentityStore, MemorySessionStore, PgIdentityStore,
    RedisSessionStore, SessionStore,
};
use crate::config::GatewayConfig;
use crate::news::NewsClient;

/// How often process-local bookkeeping (sessions, rate limiter keys) is swept
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,

    /// Upstream news provider client
    news: NewsClient,

    /// User accounts (Postgres or in-memory)
    identity: Arc<dyn IdentityStore>,

    /// Login sessions (Redis or in-memory)
    sessions: Arc<dyn SessionStore>,

    /// Failed login attempts per username
    login_throttle: LoginThrottle,
}

impl AppState {
    /// Create application state from configuration, connecting optional backends
    pub async fn new(config: GatewayConfig) -> Result<Self> {
        let news = NewsClient::from_config(&config)?;
        if !news.is_configured() {
            warn!("NEWSAPI_KEY is not set; news endpoints will return configuration errors");
        }

        let identity: Arc<dyn IdentityStore> = match config.database_url.as_deref() {
            Some(url) => {
                let store = PgIdentityStore::connect(url)
                    .await
                    .context("Failed to initialise PostgreSQL identity store")?;
                info!("Using PostgreSQL identity store");
                Arc::new(store)
            }
            None => {
                info!("DATABASE_URL not set; using in-memory identity store");
                Arc::new(MemoryIdentityStore::new())
            }
        };

        let mut memory_sessions = None;
        let sessions: Arc<dyn SessionStore> = match config.redis_url.as_deref() {
            Some(url) => {
                let store = RedisSessionStore::connect(url, config.session_ttl)
                    .await
                    .context("Failed to initialise Redis session store")?;
                info!("Using Redis session store");
                Arc::new(store)
            }
            None => {
                info!("REDIS_URL not set; using in-memory session store");
                let store = Arc::new(MemorySessionStore::new(config.session_ttl));
                memory_sessions = Some(store.clone());
                store
            }
        };

        let state = Self::from_parts(config, news, identity, sessions);
        state.spawn_maintenance(memory_sessions);
        Ok(state)
    }

    /// Assemble state from already-built collaborators
    pub fn from_parts(
        config: GatewayConfig,
        news: NewsClient,
        identity: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let per_minute = NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let login_throttle = LoginThrottle::per_minute(per_minute);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                news,
                identity,
                sessions,
                login_throttle,
            }),
        }
    }

    /// State backed entirely by in-memory stores, without background tasks
    pub fn in_memory(config: GatewayConfig) -> Result<Self> {
        let news = NewsClient::from_config(&config)?;
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl));
        Ok(Self::from_parts(
            config,
            news,
            Arc::new(MemoryIdentityStore::new()),
            sessions,
        ))
    }

    fn spawn_maintenance(&self, memory_sessions: Option<Arc<MemorySessionStore>>) {
        if let Some(sessions) = memory_sessions {
            tokio::spawn(sessions.purge_loop(MAINTENANCE_INTERVAL));
        }

        let state = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                state.login_throttle().purge().await;
            }
        });
    }

    /// Get gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get upstream news client
    pub fn news(&self) -> &NewsClient {
        &self.inner.news
    }

    /// Get identity store
    pub fn identity(&self) -> &dyn IdentityStore {
        self.inner.identity.as_ref()
    }

    /// Get session store
    pub fn sessions(&self) -> &dyn SessionStore {
        self.inner.sessions.as_ref()
    }

    /// Get failed-login throttle
    pub fn login_throttle(&self) -> &LoginThrottle {
        &self.inner.login_throttle
    }
}
