// ==============================================================================
// auth/session.rs - Session Store Interface and In-Memory Implementation
// ==============================================================================
// Description: Opaque session tokens mapped to user ids with expiry
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
//
// Stores never see raw tokens as keys: sessions are indexed by the SHA-256
// digest of the cookie value.
//
// ==============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::AppError;
use crate::security::{generate_token, token_digest};

/// System of record for login sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user_id` and returns the new cookie token
    async fn create(&self, user_id: i64) -> Result<String, AppError>;

    /// User id behind a live session; expired or unknown tokens yield `None`
    async fn get(&self, token: &str) -> Result<Option<i64>, AppError>;

    /// Ends a session; unknown tokens are ignored
    async fn invalidate(&self, token: &str) -> Result<(), AppError>;
}

struct SessionRecord {
    user_id: i64,
    expires_at: Instant,
}

/// Sessions kept in process memory
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Drops expired sessions, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.expires_at > now);
        before - sessions.len()
    }

    /// Runs `purge_expired` every `every` until the runtime shuts down
    pub async fn purge_loop(self: Arc<Self>, every: Duration) {
        let mut interval = tokio::time::interval(every);
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = self.purge_expired().await;
            if removed > 0 {
                info!(removed, "Purged expired sessions");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i64) -> Result<String, AppError> {
        let token = generate_token();
        let record = SessionRecord {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };

        self.sessions
            .write()
            .await
            .insert(token_digest(&token), record);

        debug!(user_id, "Session created");
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<i64>, AppError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&token_digest(token))
            .filter(|record| record.expires_at > Instant::now())
            .map(|record| record.user_id))
    }

    async fn invalidate(&self, token: &str) -> Result<(), AppError> {
        if let Some(record) = self.sessions.write().await.remove(&token_digest(token)) {
            debug!(user_id = record.user_id, "Session invalidated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn create_get_invalidate() {
        let store = MemorySessionStore::new(TTL);

        let token = store.create(7).await.unwrap();
        assert_eq!(store.get(&token).await.unwrap(), Some(7));

        store.invalidate(&token).await.unwrap();
        assert_eq!(store.get(&token).await.unwrap(), None);

        // Second invalidation is a no-op
        store.invalidate(&token).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn tokens_are_unique_per_session() {
        let store = MemorySessionStore::new(TTL);
        let a = store.create(1).await.unwrap();
        let b = store.create(1).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);

        store.invalidate(&a).await.unwrap();
        assert_eq!(store.get(&b).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn unknown_token_has_no_user() {
        let store = MemorySessionStore::new(TTL);
        assert_eq!(store.get("forged").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_and_get_purged() {
        let store = MemorySessionStore::new(TTL);
        let token = store.create(3).await.unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        assert_eq!(store.get(&token).await.unwrap(), None);
        assert_eq!(store.purge_expired().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_keeps_live_sessions() {
        let store = MemorySessionStore::new(TTL);
        let old = store.create(1).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        let fresh = store.create(2).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.get(&old).await.unwrap(), None);
        assert_eq!(store.get(&fresh).await.unwrap(), Some(2));
    }
}
