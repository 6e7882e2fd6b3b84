//! Session token provisioning.
//!
//! Backend requests are authorized with a short-lived token minted by the
//! identity provider from the caller's session. The provider sits behind a
//! trait so workflows never reach for ambient session state, and a cache
//! keeps the mint rate down:
//! - Refresh margin to avoid token expiry mid-request
//! - Single-flight pattern to prevent thundering herd on refresh
//! - Graceful fallback to the existing usable token on refresh failure

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use jb_postgrest::AccessToken;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Constants
// =============================================================================

/// Refresh margin: mint a new token 10 seconds before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(10);

/// Conservative TTL for minted tokens. Identity-provider session tokens
/// are valid for 60 seconds.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50);

/// Token template the identity provider uses to mint backend-scoped JWTs.
pub const SESSION_TOKEN_TEMPLATE: &str = "supabase";

// =============================================================================
// Token provider
// =============================================================================

/// Source of backend-scoped session tokens. Injected into every workflow
/// that talks to the backend.
pub trait TokenProvider: Send + Sync {
    /// Mint a fresh token for the current session.
    fn session_token(&self) -> BoxFuture<'_, ClientResult<String>>;
}

/// Fixed-token provider for service contexts and tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn session_token(&self) -> BoxFuture<'_, ClientResult<String>> {
        Box::pin(async move {
            if self.token.trim().is_empty() {
                return Err(ClientError::session_not_ready("no session token set"));
            }
            Ok(self.token.clone())
        })
    }
}

// =============================================================================
// Clerk provider
// =============================================================================

/// Configuration for the Clerk backend API.
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    /// Clerk API base URL (no trailing slash)
    pub api_url: String,
    /// Backend secret key
    pub secret_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ClerkConfig {
    /// Create config from environment variables. `CLERK_SECRET_KEY` is
    /// required; the API URL defaults to the hosted endpoint.
    pub fn from_env() -> ClientResult<Self> {
        let secret_key = std::env::var("CLERK_SECRET_KEY")
            .map_err(|_| ClientError::session("CLERK_SECRET_KEY must be set"))?;
        if secret_key.trim().is_empty() {
            return Err(ClientError::session("CLERK_SECRET_KEY cannot be empty"));
        }

        let api_url = std::env::var("CLERK_API_URL")
            .unwrap_or_else(|_| "https://api.clerk.com".to_string());

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key,
            timeout: Duration::from_secs(10),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MintedToken {
    jwt: String,
}

/// Mints backend tokens from a Clerk session via the backend API.
pub struct ClerkTokenProvider {
    http: Client,
    config: ClerkConfig,
    session_id: String,
}

impl ClerkTokenProvider {
    pub fn new(config: ClerkConfig, session_id: impl Into<String>) -> ClientResult<Self> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(ClientError::session_not_ready("session id is missing"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jb-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::session(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            session_id,
        })
    }

    async fn mint(&self) -> ClientResult<String> {
        let url = format!(
            "{}/v1/sessions/{}/tokens/{}",
            self.config.api_url, self.session_id, SESSION_TOKEN_TEMPLATE
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| ClientError::session(format!("token mint request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ClientError::session_not_ready(format!(
                "session {} not found",
                self.session_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::session(format!(
                "token mint failed: {} {}",
                status.as_u16(),
                body
            )));
        }

        let minted: MintedToken = response
            .json()
            .await
            .map_err(|e| ClientError::session(format!("malformed token response: {}", e)))?;

        if minted.jwt.trim().is_empty() {
            return Err(ClientError::session_not_ready("minted token is empty"));
        }
        Ok(minted.jwt)
    }
}

impl TokenProvider for ClerkTokenProvider {
    fn session_token(&self) -> BoxFuture<'_, ClientResult<String>> {
        Box::pin(self.mint())
    }
}

// =============================================================================
// Token cache
// =============================================================================

/// Cached token with expiration tracking.
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Check if token is still valid with refresh margin.
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    /// Check if token is technically still usable (even if refresh is needed).
    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe token cache with single-flight refresh.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a new token cache over a provider.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
        }
    }

    /// Invalidate the cached token.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Get a valid session token, minting a fresh one if necessary.
    ///
    /// - Fast path: return cached token if still valid
    /// - Slow path: acquire write lock and refresh (double-check first)
    /// - Fallback: on mint failure, use existing token if still usable
    pub async fn get_token(&self) -> ClientResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;

        // Double-check: another task may have refreshed while we waited
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.token.clone());
            }
        }

        self.refresh(&mut cache).await
    }

    /// Get a valid token wrapped for the data layer.
    pub async fn access_token(&self) -> ClientResult<AccessToken> {
        let token = self.get_token().await?;
        Ok(AccessToken::new(token)?)
    }

    async fn refresh(&self, cache: &mut Option<CachedToken>) -> ClientResult<String> {
        match self.provider.session_token().await {
            Ok(token) => {
                *cache = Some(CachedToken {
                    token: token.clone(),
                    expires_at: Instant::now() + TOKEN_DEFAULT_TTL,
                });
                debug!("Minted session token");
                Ok(token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token mint failed, using existing token: {}", e);
                        return Ok(cached.token.clone());
                    }
                }
                Err(e)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
