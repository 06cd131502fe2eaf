// ==============================================================================
// lib.rs - News API Gateway Library
// ==============================================================================
// Description: News proxy and session-authenticated account API
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod news;
pub mod published;
pub mod router;
pub mod security;
pub mod state;

pub use config::GatewayConfig;
pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
