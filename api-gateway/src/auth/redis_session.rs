// ==============================================================================
// auth/redis_session.rs - Redis Session Store
// ==============================================================================
// Description: Sessions shared across gateway instances (used when REDIS_URL is set)
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client as RedisClient};
use std::time::Duration;
use tracing::debug;

use super::session::SessionStore;
use crate::error::AppError;
use crate::security::{generate_token, token_digest};

const SESSION_PREFIX: &str = "news:session:";

/// Sessions stored as `news:session:<digest> -> user_id` with a Redis TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self> {
        let client = RedisClient::open(redis_url)
            .context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to create Redis connection manager")?;

        Ok(Self::from_connection(conn, ttl))
    }

    pub fn from_connection(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            // SET EX rejects zero
            ttl_secs: ttl.as_secs().max(1),
        }
    }

    fn key(token: &str) -> String {
        format!("{}{}", SESSION_PREFIX, token_digest(token))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: i64) -> Result<String, AppError> {
        let token = generate_token();
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(Self::key(&token), user_id, self.ttl_secs)
            .await?;

        debug!(user_id, "Session created");
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<i64>, AppError> {
        let mut conn = self.conn.clone();
        let user_id: Option<i64> = conn.get(Self::key(token)).await?;
        Ok(user_id)
    }

    async fn invalidate(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_token_digest() {
        let key = RedisSessionStore::key("abc");
        assert_eq!(
            key,
            "news:session:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(!key.contains(":abc"));
    }
}
