// ==============================================================================
// middleware/mod.rs - API Gateway Middleware Modules
// ==============================================================================
// Description: Session authentication and CSRF protection
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod auth;
pub mod csrf;

pub use auth::AuthUser;
pub use csrf::csrf_guard;
