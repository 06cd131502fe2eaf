// ==============================================================================
// models.rs - API Data Models
// ==============================================================================
// Description: Request/response models for news and auth endpoints
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

// ==============================================================================
// NEWS
// ==============================================================================

/// Article source as reported by the upstream provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Article passed through from the upstream provider (never stored)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Display string after reshaping, see `published::reformat_published_at`.
    /// Kept as raw JSON so a non-string value passes through instead of
    /// failing the whole batch.
    #[serde(default)]
    pub published_at: Option<Value>,
    #[serde(default)]
    pub content: Option<String>,
    /// Always present in responses; `null` upstream becomes an empty source
    #[serde(default, deserialize_with = "source_or_default")]
    pub source: ArticleSource,
}

fn source_or_default<'de, D>(deserializer: D) -> Result<ArticleSource, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ArticleSource>::deserialize(deserializer)?.unwrap_or_default())
}

/// Upstream response envelope (`status` is "ok" or "error")
#[derive(Debug, Deserialize)]
pub struct UpstreamEnvelope {
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Query string for `GET /api/news/top-headlines`
///
/// Accepts both snake_case and the frontend's camelCase parameter names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadlinesQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
    pub country: Option<String>,
}

/// Query string for `GET /api/news/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub language: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

// ==============================================================================
// AUTH
// ==============================================================================

/// User representation returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

/// Login/register/me response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Option<User>,
}

impl AuthResponse {
    pub fn for_user(user: User) -> Self {
        Self {
            success: true,
            user: Some(user),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
}

impl RegisterPayload {
    /// Trim the username and treat a blank email as absent
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }
}

/// New account handed to the identity store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl From<RegisterPayload> for NewUser {
    fn from(payload: RegisterPayload) -> Self {
        Self {
            username: payload.username,
            password: payload.password,
            email: payload.email,
        }
    }
}

/// CSRF issuance response
#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub detail: String,
}

// ==============================================================================
// SERVICE
// ==============================================================================

/// API information response
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_uses_camel_case_and_defaults_source() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "title": "Load shedding suspended",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2024-01-01T10:00:00Z",
            "source": null
        }))
        .unwrap();

        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(article.source, ArticleSource::default());

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["publishedAt"], "2024-01-01T10:00:00Z");
        assert_eq!(json["source"], serde_json::json!({ "id": null, "name": null }));
        assert!(json["author"].is_null());
    }

    #[test]
    fn register_payload_normalization() {
        let payload = RegisterPayload {
            username: "  thabo ".into(),
            password: "secret".into(),
            email: Some("   ".into()),
        }
        .normalized();

        assert_eq!(payload.username, "thabo");
        assert_eq!(payload.email, None);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn register_payload_validation() {
        let blank = RegisterPayload {
            username: "".into(),
            password: "secret".into(),
            email: None,
        };
        assert!(blank.validate().is_err());

        let bad_email = RegisterPayload {
            username: "thabo".into(),
            password: "secret".into(),
            email: Some("not-an-email".into()),
        };
        assert!(bad_email.validate().is_err());

        let too_long = RegisterPayload {
            username: "x".repeat(151),
            password: "secret".into(),
            email: None,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn csrf_response_field_name() {
        let json = serde_json::to_value(CsrfResponse {
            csrf_token: "abc".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "csrfToken": "abc" }));
    }
}
