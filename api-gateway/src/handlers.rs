// ==============================================================================
// handlers.rs - API Request Handlers
// ==============================================================================
// Description: HTTP request handlers for news and auth endpoints
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    error::AppError,
    middleware::{
        auth::{expired_session_cookie, session_cookie, session_token, AuthUser},
        csrf::{csrf_cookie, csrf_token_for},
    },
    models::*,
    state::AppState,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ==============================================================================
// SERVICE
// ==============================================================================

/// Root endpoint - API information
pub async fn root() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "News API Gateway",
        version: VERSION,
        endpoints: vec![
            "/api/health - Health check",
            "/api/news/top-headlines - Top headlines (GET)",
            "/api/news/search - Search articles (GET, login required)",
            "/api/auth/csrf - Issue CSRF token (GET)",
            "/api/auth/login - Log in (POST)",
            "/api/auth/logout - Log out (POST)",
            "/api/auth/register - Create account (POST)",
            "/api/auth/me - Current user (GET, login required)",
        ],
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        timestamp: Utc::now(),
    })
}

// ==============================================================================
// NEWS
// ==============================================================================

/// Top headlines (public)
pub async fn top_headlines(
    State(state): State<AppState>,
    query: Result<Query<HeadlinesQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, AppError> {
    let Query(query) = query?;
    let articles = state.news().top_headlines(&query).await?;
    Ok(Json(articles))
}

/// Article search (login required)
///
/// The session is checked before the query string is looked at.
pub async fn search_news(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, AppError> {
    let Query(query) = query?;
    info!(user_id = user.id, "Article search");
    let articles = state.news().search(&query).await?;
    Ok(Json(articles))
}

// ==============================================================================
// AUTH
// ==============================================================================

/// Issue (or re-issue) the CSRF token and set its cookie
pub async fn get_csrf(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<CsrfResponse>) {
    let token = csrf_token_for(&jar);
    let jar = jar.add(csrf_cookie(token.clone(), state.config()));
    (jar, Json(CsrfResponse { csrf_token: token }))
}

/// Log in with username and password
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;
    let username = payload.username.trim();

    if state.login_throttle().is_locked(username).await {
        warn!(username, "Login rejected while locked out");
        return Err(AppError::TooManyRequests);
    }

    let Some(user) = state
        .identity()
        .authenticate(username, &payload.password)
        .await?
    else {
        info!(username, "Failed login attempt");
        if state.login_throttle().record_failure(username).await {
            return Err(AppError::TooManyRequests);
        }
        return Err(AppError::InvalidCredentials);
    };

    let jar = start_session(&state, jar, user.id).await?;
    info!(user_id = user.id, "User logged in");

    Ok((jar, Json(AuthResponse::for_user(user))))
}

/// Log out; succeeds whether or not a session exists
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    if let Some(token) = session_token(&jar) {
        state.sessions().invalidate(&token).await?;
        info!("User logged out");
    }

    Ok((
        jar.remove(expired_session_cookie()),
        Json(MessageResponse {
            detail: "Logged out".to_string(),
        }),
    ))
}

/// Create an account and log it in
pub async fn register_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;
    let payload = payload.normalized();
    payload.validate().map_err(validation_error)?;

    let user = state.identity().create(NewUser::from(payload)).await?;

    let jar = start_session(&state, jar, user.id).await?;
    info!(user_id = user.id, "User registered");

    Ok((jar, Json(AuthResponse::for_user(user))))
}

/// Current user behind the session
pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<AuthResponse> {
    Json(AuthResponse::for_user(user))
}

/// Replace any session the client presented with a fresh one
async fn start_session(state: &AppState, jar: CookieJar, user_id: i64) -> Result<CookieJar, AppError> {
    if let Some(previous) = session_token(&jar) {
        state.sessions().invalidate(&previous).await?;
    }

    let token = state.sessions().create(user_id).await?;
    Ok(jar.add(session_cookie(token, state.config())))
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"))
            })
        })
        .collect();
    messages.sort();

    AppError::BadRequest(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_joined() {
        let payload = RegisterPayload {
            username: String::new(),
            password: String::new(),
            email: None,
        };

        let err = validation_error(payload.validate().unwrap_err());
        match err {
            AppError::BadRequest(message) => {
                assert_eq!(
                    message,
                    "Password must not be empty; Username must be 1-150 characters"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
