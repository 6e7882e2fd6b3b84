//! Resume store implementation.
//!
//! Talks to the hosted object-storage REST surface. Resumes live in a
//! public-read bucket; uploads and deletes are authorized by the caller's
//! bearer token, reads go through the public URL.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Bucket holding uploaded resumes.
pub const RESUME_BUCKET: &str = "resumes";

/// Configuration for the resume store. Shares the project URL and anon key
/// with the data layer.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend project base URL (no trailing slash)
    pub base_url: String,
    /// Anonymous API key, sent as the `apikey` header
    pub anon_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| StorageError::config_error("SUPABASE_URL must be set"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| StorageError::config_error("SUPABASE_ANON_KEY must be set"))?;

        if base_url.trim().is_empty() || anon_key.trim().is_empty() {
            return Err(StorageError::config_error(
                "SUPABASE_URL and SUPABASE_ANON_KEY cannot be empty",
            ));
        }

        let timeout_secs: u64 = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(5),
        })
    }
}

/// Generate a collision-proof object name for a candidate's resume.
/// Uniqueness comes from the UUID, the candidate id is kept for
/// traceability in the bucket listing.
pub fn resume_object_name(candidate_id: &str) -> String {
    let safe_id: String = candidate_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("resume-{}-{}", Uuid::new_v4(), safe_id)
}

/// Object storage client for resumes. Cheap to clone.
#[derive(Clone)]
pub struct ResumeStore {
    http: Client,
    config: StorageConfig,
    storage_url: String,
}

impl ResumeStore {
    /// Create a new resume store from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("jb-storage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StorageError::Network)?;

        let storage_url = format!("{}/storage/v1", config.base_url);

        Ok(Self {
            http,
            config,
            storage_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Self::new(StorageConfig::from_env()?)
    }

    /// Public-read URL for an uploaded resume.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            RESUME_BUCKET,
            urlencoding::encode(object_name)
        )
    }

    /// Upload a resume and return its public URL.
    pub async fn upload_resume(
        &self,
        token: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StorageResult<String> {
        Self::validate_name(object_name)?;
        self.require_token(token)?;

        let url = self.object_url(object_name);
        debug!(object_name, size = bytes.len(), "Uploading resume");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload_failed(format!(
                "{}: {} {}",
                object_name,
                status.as_u16(),
                body
            )));
        }

        info!(object_name, "Uploaded resume");
        Ok(self.public_url(object_name))
    }

    /// Delete a resume. Used as the compensating step when the application
    /// insert fails after the upload already went through.
    pub async fn delete_resume(&self, token: &str, object_name: &str) -> StorageResult<()> {
        Self::validate_name(object_name)?;
        self.require_token(token)?;

        let url = self.object_url(object_name);

        let response = self
            .http
            .delete(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            warn!(object_name, "Resume already gone");
            return Err(StorageError::not_found(object_name));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::delete_failed(format!(
                "{}: {} {}",
                object_name,
                status.as_u16(),
                body
            )));
        }

        info!(object_name, "Deleted resume");
        Ok(())
    }

    /// Check that the storage surface is reachable.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        let response = self
            .http
            .get(format!("{}/bucket", self.storage_url))
            .header("apikey", &self.config.anon_key)
            .send()
            .await?;

        // Auth failures still prove the surface is up
        if response.status().is_server_error() {
            return Err(StorageError::config_error(format!(
                "storage unreachable: {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.storage_url,
            RESUME_BUCKET,
            urlencoding::encode(object_name)
        )
    }

    fn require_token(&self, token: &str) -> StorageResult<()> {
        if token.trim().is_empty() {
            return Err(StorageError::PermissionDenied(
                "access token is missing".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_name(object_name: &str) -> StorageResult<()> {
        if object_name.trim().is_empty() {
            return Err(StorageError::invalid_name("object name is empty"));
        }
        if object_name.contains('/') {
            return Err(StorageError::invalid_name(format!(
                "object name may not contain '/': {}",
                object_name
            )));
        }
        Ok(())
    }
}
