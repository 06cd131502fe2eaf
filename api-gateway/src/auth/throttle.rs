// ==============================================================================
// auth/throttle.rs - Failed Login Throttling
// ==============================================================================
// Description: Per-username budget of failed logins with a short lockout
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
//
// Only failed attempts spend the governor budget, so repeated successful
// logins never lock an account. Once the budget is spent the username is
// locked for one replenish interval, correct password or not.
//
// ==============================================================================

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

pub struct LoginThrottle {
    failures: DefaultKeyedRateLimiter<String>,
    locked_until: RwLock<HashMap<String, Instant>>,
    lockout: Duration,
}

impl LoginThrottle {
    /// `per_minute` failed attempts are allowed before a lockout
    pub fn per_minute(per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(per_minute);
        Self {
            failures: RateLimiter::keyed(quota),
            locked_until: RwLock::new(HashMap::new()),
            lockout: quota.replenish_interval(),
        }
    }

    pub async fn is_locked(&self, username: &str) -> bool {
        self.locked_until
            .read()
            .await
            .get(username)
            .is_some_and(|until| *until > Instant::now())
    }

    /// Charges one failed attempt; returns `true` when this locks the username
    pub async fn record_failure(&self, username: &str) -> bool {
        let key = username.to_string();
        if self.failures.check_key(&key).is_ok() {
            return false;
        }

        warn!(username, lockout_secs = self.lockout.as_secs(), "Login attempts exhausted");
        self.locked_until
            .write()
            .await
            .insert(key, Instant::now() + self.lockout);
        true
    }

    /// Drops expired lockouts and idle limiter keys
    pub async fn purge(&self) {
        let now = Instant::now();
        self.locked_until.write().await.retain(|_, until| *until > now);
        self.failures.retain_recent();
        self.failures.shrink_to_fit();
    }
}
