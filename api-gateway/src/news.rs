// ==============================================================================
// news.rs - Upstream News Provider Client
// ==============================================================================
// Description: NewsAPI client for top headlines and article search
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
//
// One outbound GET per call, bounded by the client timeout. The provider key
// travels in the X-Api-Key header and never appears in URLs or logs.
//
// ==============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::models::{Article, HeadlinesQuery, SearchQuery, UpstreamEnvelope};
use crate::published::reformat_published_at;

// ==============================================================================
// CONSTANTS
// ==============================================================================

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

const DEFAULT_COUNTRY: &str = "za";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_SORT_BY: &str = "publishedAt";

const TOP_HEADLINES_ENDPOINT: &str = "top-headlines";
const EVERYTHING_ENDPOINT: &str = "everything";

const API_KEY_HEADER: &str = "X-Api-Key";
const MISSING_KEY_MESSAGE: &str = "NEWSAPI_KEY is not configured";
const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from upstream provider";

/// Effective page size sent upstream, always within [1, 100]
pub fn clamp_page_size(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Effective page number sent upstream, always at least 1
pub fn clamp_page(requested: Option<i64>) -> i64 {
    requested.unwrap_or(1).max(1)
}

/// Non-blank trimmed value or the given default
fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

// ==============================================================================
// CLIENT
// ==============================================================================

/// Client for the upstream news provider
#[derive(Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl NewsClient {
    /// Create a client with a bounded per-call timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<Secret<String>>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("news-api-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::new(
            config.newsapi_base_url.clone(),
            config.newsapi_key.clone(),
            config.upstream_timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&Secret<String>, AppError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| AppError::Config(MISSING_KEY_MESSAGE.to_string()))
    }

    /// Top headlines for a country, optionally narrowed to a category
    pub async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<Vec<Article>, AppError> {
        let mut params = vec![
            ("country", or_default(query.country.as_deref(), DEFAULT_COUNTRY)),
            ("page", clamp_page(query.page).to_string()),
            ("pageSize", clamp_page_size(query.page_size).to_string()),
        ];

        if let Some(category) = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            params.push(("category", category.to_string()));
        }

        self.fetch_articles(TOP_HEADLINES_ENDPOINT, &params).await
    }

    /// Full-text article search; `q` must be non-blank
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, AppError> {
        let q = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".to_string()))?;

        let params = vec![
            ("q", q.to_string()),
            ("language", or_default(query.language.as_deref(), DEFAULT_LANGUAGE)),
            ("sortBy", or_default(query.sort_by.as_deref(), DEFAULT_SORT_BY)),
            ("page", clamp_page(query.page).to_string()),
            ("pageSize", clamp_page_size(query.page_size).to_string()),
        ];

        self.fetch_articles(EVERYTHING_ENDPOINT, &params).await
    }

    async fn fetch_articles(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Article>, AppError> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(endpoint, ?params, "Calling upstream news provider");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint, timeout = e.is_timeout(), "Upstream request failed: {}", e);
                AppError::UpstreamUnavailable
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(endpoint, %status, "Failed to read upstream body: {}", e);
            AppError::UpstreamUnavailable
        })?;

        // NewsAPI reports errors in the JSON envelope, including on 4xx/5xx
        let envelope: UpstreamEnvelope = serde_json::from_slice(&body).map_err(|e| {
            warn!(endpoint, %status, "Unparseable upstream response: {}", e);
            AppError::UpstreamUnavailable
        })?;

        if envelope.status.as_deref() != Some("ok") {
            warn!(
                endpoint,
                %status,
                code = envelope.code.as_deref().unwrap_or("unknown"),
                "Upstream provider reported an error"
            );
            return Err(AppError::Upstream(
                envelope
                    .message
                    .unwrap_or_else(|| UNEXPECTED_RESPONSE_MESSAGE.to_string()),
            ));
        }

        let articles: Vec<Article> = envelope
            .articles
            .into_iter()
            .map(reshape_article)
            .collect();

        info!(endpoint, count = articles.len(), "Fetched articles from upstream");
        Ok(articles)
    }
}

/// Apply the display timestamp to one upstream article
fn reshape_article(mut article: Article) -> Article {
    // Non-string timestamps are passed through untouched
    if let Some(Value::String(raw)) = article.published_at.as_mut() {
        *raw = reformat_published_at(raw);
    }
    article
}

// ==============================================================================
// TESTS
// ==============================================================================
