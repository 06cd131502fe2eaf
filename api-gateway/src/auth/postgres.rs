// ==============================================================================
// auth/postgres.rs - PostgreSQL Identity Store
// ==============================================================================
// Description: User accounts persisted in PostgreSQL (used when DATABASE_URL is set)
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::store::{
    hash_password_blocking, verify_password_blocking, IdentityStore, USERNAME_TAKEN_MESSAGE,
};
use crate::error::AppError;
use crate::models::{NewUser, User};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS gateway_users (
        id            BIGSERIAL PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        email         TEXT,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Accounts stored in the `gateway_users` table
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    /// Connect and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create gateway_users table")?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, (i64, String, Option<String>, String)>(
            r#"
            SELECT id, username, email, password_hash
            FROM gateway_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, username, email, password_hash)) = row else {
            return Ok(None);
        };

        if verify_password_blocking(password.to_string(), password_hash).await? {
            Ok(Some(User { id, username, email }))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let password_hash = hash_password_blocking(new_user.password).await?;

        // The UNIQUE constraint settles concurrent registrations
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO gateway_users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AppError::Conflict(USERNAME_TAKEN_MESSAGE.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = id, "Created account");
        Ok(User {
            id,
            username: new_user.username,
            email: new_user.email,
        })
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, (i64, String, Option<String>)>(
            "SELECT id, username, email FROM gateway_users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, email)| User { id, username, email }))
    }
}
