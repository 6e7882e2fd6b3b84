//! PostgREST client.
//!
//! Thin, tuned HTTP client over the hosted REST surface:
//! - Anon key + per-call bearer token on every request
//! - Range pagination with exact counts
//! - Exponential backoff with jitter on transport and 5xx failures
//! - Observability (tracing spans, metrics)

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info_span, Instrument};

use jb_models::Page;

use crate::error::{PostgrestError, PostgrestResult};
use crate::metrics::record_request;
use crate::query::{parse_content_range_total, Query};
use crate::retry::{with_retry, RetryConfig};

// =============================================================================
// Access token
// =============================================================================

/// A backend-scoped bearer token for the current user. Construction rejects
/// empty tokens so every operation fails before a request is issued when the
/// credential is missing.
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> PostgrestResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(PostgrestError::missing_credential(
                "access token is missing",
            ));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// PostgREST client configuration.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Backend project base URL (no trailing slash)
    pub base_url: String,
    /// Anonymous API key, sent as the `apikey` header
    pub anon_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl PostgrestConfig {
    /// Create config from environment variables. `SUPABASE_URL` and
    /// `SUPABASE_ANON_KEY` are required and must be non-empty.
    pub fn from_env() -> PostgrestResult<Self> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| PostgrestError::config_error("SUPABASE_URL must be set"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| PostgrestError::config_error("SUPABASE_ANON_KEY must be set"))?;

        if base_url.trim().is_empty() || anon_key.trim().is_empty() {
            return Err(PostgrestError::config_error(
                "SUPABASE_URL and SUPABASE_ANON_KEY cannot be empty",
            ));
        }

        let timeout_secs: u64 = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let connect_timeout_secs: u64 = std::env::var("SUPABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Successful response payload before deserialization.
struct RawResponse {
    status: u16,
    content_range: Option<String>,
    body: String,
}

/// PostgREST client. Cheap to clone; the inner HTTP client is pooled.
#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    config: PostgrestConfig,
    rest_url: String,
}

impl PostgrestClient {
    /// Create a new client.
    pub fn new(config: PostgrestConfig) -> PostgrestResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jb-postgrest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PostgrestError::Network)?;

        let rest_url = format!("{}/rest/v1", config.base_url);

        Ok(Self {
            http,
            config,
            rest_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> PostgrestResult<Self> {
        let config = PostgrestConfig::from_env()?;
        Self::new(config)
    }

    /// Project base URL (shared with the storage client).
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Attach the credential headers every request carries.
    fn authed(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    // =========================================================================
    // Table operations
    // =========================================================================

    /// Read rows.
    pub async fn select_rows<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<Vec<T>> {
        let raw = self.read(token, table, query, "select").await?;
        Ok(serde_json::from_str(&raw.body)?)
    }

    /// Read a page of rows with an exact total count. The query must have
    /// requested `count=exact`; a response without a parseable total is an
    /// invalid-response error.
    pub async fn select_page<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<Page<T>> {
        let raw = self.read(token, table, query, "select_page").await?;

        let total_count = raw
            .content_range
            .as_deref()
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                PostgrestError::invalid_response(format!(
                    "{}: missing or unparseable Content-Range (got {:?})",
                    table, raw.content_range
                ))
            })?;

        Ok(Page {
            rows: serde_json::from_str(&raw.body)?,
            total_count,
        })
    }

    async fn read(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
        operation: &'static str,
    ) -> PostgrestResult<RawResponse> {
        let mut request = self
            .authed(self.http.get(self.table_url(table)), token)
            .query(&query.query_pairs());

        if let Some(range) = query.range_header() {
            request = request.header("Range-Unit", "items").header("Range", range);
        }
        if let Some(prefer) = query.prefer_header() {
            request = request.header("Prefer", prefer);
        }

        self.dispatch(operation, table, request).await
    }

    /// Insert rows, returning the inserted representation.
    pub async fn insert_rows<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &AccessToken,
        table: &str,
        body: &B,
    ) -> PostgrestResult<Vec<T>> {
        let request = self
            .authed(self.http.post(self.table_url(table)), token)
            .header("Prefer", "return=representation")
            .json(body);

        let raw = self.dispatch("insert", table, request).await?;
        Ok(serde_json::from_str(&raw.body)?)
    }

    /// Update rows matching the query filters, returning the updated
    /// representation. Zero returned rows means nothing matched (or
    /// row-level security denied the write) — callers decide whether that
    /// is an error.
    pub async fn update_rows<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
        body: &B,
    ) -> PostgrestResult<Vec<T>> {
        let request = self
            .authed(self.http.patch(self.table_url(table)), token)
            .query(&query.query_pairs())
            .header("Prefer", "return=representation")
            .json(body);

        let raw = self.dispatch("update", table, request).await?;
        Ok(serde_json::from_str(&raw.body)?)
    }

    /// Delete rows matching the query filters, returning the deleted
    /// representation.
    pub async fn delete_rows<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<Vec<T>> {
        let request = self
            .authed(self.http.delete(self.table_url(table)), token)
            .query(&query.query_pairs())
            .header("Prefer", "return=representation");

        let raw = self.dispatch("delete", table, request).await?;
        Ok(serde_json::from_str(&raw.body)?)
    }

    /// Check connectivity by hitting the REST root with the anon key only.
    pub async fn check_connectivity(&self) -> PostgrestResult<()> {
        let request = self
            .http
            .get(format!("{}/", self.rest_url))
            .header("apikey", &self.config.anon_key);

        self.dispatch("connectivity", "_root", request).await?;
        Ok(())
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Issue a request with retry, tracing and metrics.
    async fn dispatch(
        &self,
        operation: &'static str,
        table: &str,
        request: RequestBuilder,
    ) -> PostgrestResult<RawResponse> {
        let span = info_span!("postgrest_request", operation = %operation, table = %table);
        let start = Instant::now();

        let result = with_retry(&self.config.retry, operation, || async {
            let request = request
                .try_clone()
                .ok_or_else(|| PostgrestError::request_failed("request cannot be retried"))?;

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                let content_range = response
                    .headers()
                    .get("content-range")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                let body = response.text().await?;
                Ok(RawResponse {
                    status: status.as_u16(),
                    content_range,
                    body,
                })
            } else if status.as_u16() == 429 {
                let retry_after_ms = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(|secs| secs * 1000)
                    .unwrap_or(1000);
                Err(PostgrestError::RateLimited(retry_after_ms))
            } else {
                let code = status.as_u16();
                let body = response.text().await.unwrap_or_default();
                Err(PostgrestError::from_http_status(
                    code,
                    format!("{} {} failed: {}", operation, table, body),
                ))
            }
        })
        .instrument(span)
        .await;

        let latency_ms = start.elapsed().as_millis() as f64;
        let status = match &result {
            Ok(raw) => raw.status,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }
}

// =============================================================================
// Tests
// =============================================================================
