// ==============================================================================
// auth/mod.rs - Identity and Session Stores
// ==============================================================================
// Description: Collaborator interfaces for user accounts and login sessions
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod memory;
pub mod postgres;
pub mod redis_session;
pub mod session;
pub mod store;
pub mod throttle;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;
pub use redis_session::RedisSessionStore;
pub use session::{MemorySessionStore, SessionStore};
pub use store::IdentityStore;
pub use throttle::LoginThrottle;
