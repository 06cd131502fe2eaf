// ==============================================================================
// auth/memory.rs - In-Memory Identity Store
// ==============================================================================
// Description: Process-local user accounts (default when DATABASE_URL is unset)
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use super::store::{
    hash_password_blocking, verify_password_blocking, IdentityStore, USERNAME_TAKEN_MESSAGE,
};
use crate::error::AppError;
use crate::models::{NewUser, User};

struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct Accounts {
    by_username: HashMap<String, StoredUser>,
    username_by_id: HashMap<i64, String>,
    last_id: i64,
}

/// Accounts kept in process memory; lost on restart
#[derive(Default)]
pub struct MemoryIdentityStore {
    accounts: RwLock<Accounts>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_username.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let candidate = {
            let accounts = self.accounts.read().await;
            accounts
                .by_username
                .get(username)
                .map(|stored| (stored.user.clone(), stored.password_hash.clone()))
        };

        let Some((user, hash)) = candidate else {
            return Ok(None);
        };

        if verify_password_blocking(password.to_string(), hash).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        // Hash before taking the lock; the existence check below is authoritative
        let password_hash = hash_password_blocking(new_user.password).await?;

        let mut accounts = self.accounts.write().await;
        if accounts.by_username.contains_key(&new_user.username) {
            return Err(AppError::Conflict(USERNAME_TAKEN_MESSAGE.to_string()));
        }

        accounts.last_id += 1;
        let user = User {
            id: accounts.last_id,
            username: new_user.username,
            email: new_user.email,
        };

        accounts
            .username_by_id
            .insert(user.id, user.username.clone());
        accounts.by_username.insert(
            user.username.clone(),
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        info!(user_id = user.id, "Created account");
        Ok(user)
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .username_by_id
            .get(&user_id)
            .and_then(|username| accounts.by_username.get(username))
            .map(|stored| stored.user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: password.into(),
            email: Some(format!("{username}@example.co.za")),
        }
    }

    #[tokio::test]
    async fn create_then_authenticate() {
        let store = MemoryIdentityStore::new();
        let user = store.create(new_user("lerato", "pa55word")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "lerato");

        let found = store.authenticate("lerato", "pa55word").await.unwrap();
        assert_eq!(found, Some(user.clone()));

        assert_eq!(store.get(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user() {
        let store = MemoryIdentityStore::new();
        store.create(new_user("lerato", "pa55word")).await.unwrap();

        assert!(store.authenticate("lerato", "nope").await.unwrap().is_none());
        assert!(store.authenticate("Lerato", "pa55word").await.unwrap().is_none());
        assert!(store.authenticate("sipho", "pa55word").await.unwrap().is_none());
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_without_second_record() {
        let store = MemoryIdentityStore::new();
        let first = store.create(new_user("lerato", "first")).await.unwrap();

        let err = store.create(new_user("lerato", "second")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == USERNAME_TAKEN_MESSAGE));
        assert_eq!(store.len().await, 1);

        // Original credentials still win
        assert_eq!(store.authenticate("lerato", "first").await.unwrap(), Some(first));
        assert!(store.authenticate("lerato", "second").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = MemoryIdentityStore::new();
        let a = store.create(new_user("a", "x")).await.unwrap();
        let b = store.create(new_user("b", "x")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }
}
