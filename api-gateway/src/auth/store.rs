// ==============================================================================
// auth/store.rs - Identity Store Interface
// ==============================================================================
// Description: Account lookup, creation, and credential checks
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::security::{hash_password, verify_password};

pub const USERNAME_TAKEN_MESSAGE: &str = "Username is already taken";

/// System of record for user accounts
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns the user when the credentials match, `None` otherwise
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError>;

    /// Creates an account; `AppError::Conflict` if the username exists
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn get(&self, user_id: i64) -> Result<Option<User>, AppError>;
}

/// Argon2id hashing off the async runtime
pub(crate) async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// Argon2id verification off the async runtime
pub(crate) async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))?
        .map_err(AppError::from)
}
