// ==============================================================================
// middleware/auth.rs - Session Cookie Authentication
// ==============================================================================
// Description: Resolve the session cookie to the logged-in user
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
//
// Security: The session cookie is HttpOnly and SameSite=Lax. The token is
// resolved through the session store and then the identity store; a session
// whose user no longer exists is treated as unauthenticated.
//
// ==============================================================================

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "sessionid";

/// Authenticated user resolved from the session cookie
///
/// Rejects with 401 when the cookie is missing, unknown, or expired.
///
/// # Example
/// ```rust,ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar).ok_or(AppError::Unauthorized)?;

        let user_id = state
            .sessions()
            .get(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        match state.identity().get(user_id).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!(user_id, "Session refers to a missing account");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Session token carried by the request, if any
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Cookie carrying a freshly created session
pub fn session_cookie(token: String, config: &GatewayConfig) -> Cookie<'static> {
    let max_age = i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX);

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie template used to clear the session cookie
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use axum::http::{header, Request};

    fn state() -> AppState {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();
        AppState::in_memory(config).unwrap()
    }

    async fn extract(state: &AppState, cookie: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder();
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn test_auth_user_extraction() {
        let state = state();
        let user = state
            .identity()
            .create(NewUser {
                username: "testuser".into(),
                password: "secret".into(),
                email: None,
            })
            .await
            .unwrap();
        let token = state.sessions().create(user.id).await.unwrap();

        let result = extract(&state, Some(&format!("{SESSION_COOKIE}={token}"))).await;
        assert_eq!(result.unwrap().0, user);
    }

    #[tokio::test]
    async fn test_auth_user_missing_cookie() {
        let result = extract(&state(), None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_auth_user_empty_cookie() {
        let result = extract(&state(), Some("sessionid=")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_auth_user_unknown_session() {
        let result = extract(&state(), Some("sessionid=forged-token")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_auth_user_orphaned_session() {
        let state = state();
        let token = state.sessions().create(999).await.unwrap();

        let result = extract(&state, Some(&format!("{SESSION_COOKIE}={token}"))).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = GatewayConfig::from_lookup(|name| {
            (name == "COOKIE_SECURE").then(|| "true".to_string())
        })
        .unwrap();

        let cookie = session_cookie("abc".into(), &config);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1_209_600)));
    }
}
