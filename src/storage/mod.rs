//! Object storage client for the managed platform's storage buckets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Generated videos live in a storage bucket. The video proxy downloads an
//! object by path through [`ObjectStore`] and slices it for range requests.
//! [`SupabaseStorage`] talks to the storage REST API with the service-role
//! key; tests substitute an in-memory store.

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;

const DEFAULT_VIDEO_BUCKET: &str = "videos";
const STORAGE_REQUEST_TIMEOUT_SECS: u64 = 60;
const STORAGE_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage not configured: env var {0} not set")]
    NotConfigured(&'static str),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("storage responded with status {status}")]
    Response { status: u16, body: String },
}

// =============================================================================
// TYPES
// =============================================================================

/// A downloaded object held in memory.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Read access to a bucket of objects.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no such object exists, or
    /// another variant if the request fails.
    async fn download(&self, path: &str) -> Result<StoredObject, StorageError>;
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    /// Read `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY` and `VIDEO_BUCKET`
    /// (default `videos`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] naming the first missing var.
    pub fn from_env() -> Result<Self, StorageError> {
        let base_url = non_empty_env("SUPABASE_URL").ok_or(StorageError::NotConfigured("SUPABASE_URL"))?;
        let service_key = non_empty_env("SUPABASE_SERVICE_ROLE_KEY")
            .ok_or(StorageError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY"))?;
        let bucket = non_empty_env("VIDEO_BUCKET").unwrap_or_else(|| DEFAULT_VIDEO_BUCKET.to_string());
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), service_key, bucket })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// =============================================================================
// SUPABASE STORAGE
// =============================================================================

pub struct SupabaseStorage {
    http: reqwest::Client,
    config: StorageConfig,
}

impl SupabaseStorage {
    /// # Errors
    ///
    /// Returns [`StorageError::Request`] if the HTTP client cannot be built.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(STORAGE_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(STORAGE_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn object_url(&self, path: &str) -> Result<reqwest::Url, StorageError> {
        object_url(&self.config.base_url, &self.config.bucket, path)
    }
}

/// `{base}/storage/v1/object/{bucket}/{path}` with each path segment
/// percent-encoded, so the request can never leave the bucket.
pub(crate) fn object_url(base_url: &str, bucket: &str, path: &str) -> Result<reqwest::Url, StorageError> {
    let mut url = reqwest::Url::parse(base_url).map_err(|e| StorageError::Request(format!("invalid base url: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| StorageError::Request(format!("base url cannot hold a path: {base_url}")))?
        .pop_if_empty()
        .extend(["storage", "v1", "object", bucket])
        .extend(path.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

/// The storage API reports a missing object as 404, or as 400 with a
/// `not_found` error body on older deployments.
pub(crate) fn is_not_found(status: u16, body: &str) -> bool {
    status == 404 || (status == 400 && (body.contains("not_found") || body.contains("Object not found")))
}

#[async_trait::async_trait]
impl ObjectStore for SupabaseStorage {
    async fn download(&self, path: &str) -> Result<StoredObject, StorageError> {
        let response = self
            .http
            .get(self.object_url(path)?)
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_not_found(status, &body) {
                return Err(StorageError::NotFound(path.to_string()));
            }
            return Err(StorageError::Response { status, body });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(StoredObject { bytes, content_type })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
