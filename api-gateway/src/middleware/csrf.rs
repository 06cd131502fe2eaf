// ==============================================================================
// middleware/csrf.rs - CSRF Protection (Double-Submit Cookie)
// ==============================================================================
// Description: Reject unsafe requests whose X-CSRFToken header does not match
//              the csrftoken cookie
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use axum::{
    extract::Request,
    http::{HeaderName, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::security::{constant_time_eq, generate_token};

/// CSRF cookie name (readable by the frontend)
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the frontend echoes the token in
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrftoken");

/// One year, matching the lifetime browsers keep the token
const CSRF_COOKIE_MAX_AGE_SECS: i64 = 31_449_600;

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Middleware: unsafe methods must present matching cookie and header tokens
pub async fn csrf_guard(jar: CookieJar, request: Request, next: Next) -> Result<Response, AppError> {
    if is_safe_method(request.method()) {
        return Ok(next.run(request).await);
    }

    let cookie_token = jar.get(CSRF_COOKIE).map(|c| c.value()).unwrap_or_default();
    let header_token = request
        .headers()
        .get(&CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let verified = !cookie_token.is_empty() && constant_time_eq(cookie_token, header_token);
    if !verified {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            cookie_present = !cookie_token.is_empty(),
            header_present = !header_token.is_empty(),
            "CSRF verification failed"
        );
        return Err(AppError::CsrfFailed);
    }

    Ok(next.run(request).await)
}

/// Token already issued to this client, or a new one
pub fn csrf_token_for(jar: &CookieJar) -> String {
    jar.get(CSRF_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
        .unwrap_or_else(generate_token)
}

pub fn csrf_cookie(token: String, config: &GatewayConfig) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .http_only(false)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(CSRF_COOKIE_MAX_AGE_SECS))
        .build()
}
