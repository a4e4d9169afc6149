//! Video generation records: creation, lookup and provider webhooks.
//!
//! DESIGN
//! ======
//! Videos are rendered by an external provider. A record is registered with
//! the provider's project identifier when generation starts; the provider
//! later calls the webhook with a status and, once finished, a download URL.
//! Records live in the `video_generations` table and are reached through
//! [`VideoStore`] so handlers can run against an in-memory store in tests.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Status assigned to a freshly registered record.
pub const STATUS_PENDING: &str = "pending";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("no video record for project {0}")]
    ProjectNotFound(String),
    #[error("video record not found: {0}")]
    NotFound(Uuid),
    #[error("project already registered: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A row of `video_generations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub project_id: String,
    pub title: Option<String>,
    pub status: String,
    pub video_url: Option<String>,
    pub duration: Option<f64>,
}

type VideoRow = (Uuid, String, Option<String>, String, Option<String>, Option<f64>);

impl From<VideoRow> for VideoRecord {
    fn from((id, project_id, title, status, video_url, duration): VideoRow) -> Self {
        Self { id, project_id, title, status, video_url, duration }
    }
}

/// Provider callback body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub project_id: Option<String>,
    pub status: Option<String>,
    pub download_url: Option<String>,
    pub duration: Option<f64>,
}

/// Validated changes to apply to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoUpdate {
    pub status: String,
    pub video_url: Option<String>,
    pub duration: Option<f64>,
}

/// Body for registering a new record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub project_id: Option<String>,
    pub title: Option<String>,
}

/// Persistence seam for video records.
#[async_trait::async_trait]
pub trait VideoStore: Send + Sync {
    async fn create(&self, project_id: &str, title: Option<&str>) -> Result<VideoRecord, VideoError>;
    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, VideoError>;
    async fn find_by_project_id(&self, project_id: &str) -> Result<Option<VideoRecord>, VideoError>;
    async fn update(&self, id: Uuid, update: &VideoUpdate) -> Result<VideoRecord, VideoError>;
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate a webhook payload into the project id and the update to apply.
///
/// # Errors
///
/// Returns [`VideoError::MissingField`] when `projectId` or `status` is
/// absent or blank, and [`VideoError::InvalidField`] for a negative or
/// non-finite duration.
pub fn validate_webhook(payload: WebhookPayload) -> Result<(String, VideoUpdate), VideoError> {
    let project_id = non_blank(payload.project_id).ok_or(VideoError::MissingField("projectId"))?;
    let status = non_blank(payload.status)
        .ok_or(VideoError::MissingField("status"))?
        .to_ascii_lowercase();
    if let Some(duration) = payload.duration {
        if !duration.is_finite() || duration < 0.0 {
            return Err(VideoError::InvalidField { field: "duration", reason: format!("{duration} is not a valid length") });
        }
    }
    let video_url = non_blank(payload.download_url);
    Ok((project_id, VideoUpdate { status, video_url, duration: payload.duration }))
}

/// Apply a provider webhook to the record matching its project id.
///
/// # Errors
///
/// Returns a validation error for bad payloads,
/// [`VideoError::ProjectNotFound`] when no record matches, or
/// [`VideoError::Database`] if the lookup or update fails.
pub async fn apply_webhook(store: &dyn VideoStore, payload: WebhookPayload) -> Result<VideoRecord, VideoError> {
    let (project_id, update) = validate_webhook(payload)?;

    let record = store
        .find_by_project_id(&project_id)
        .await?
        .ok_or_else(|| VideoError::ProjectNotFound(project_id.clone()))?;

    let updated = store.update(record.id, &update).await?;
    info!(id = %updated.id, %project_id, status = %updated.status, "video: webhook applied");
    Ok(updated)
}

/// Register a new record in the `pending` state.
///
/// # Errors
///
/// Returns [`VideoError::MissingField`] without a project id,
/// [`VideoError::Duplicate`] if the project is already registered, or
/// [`VideoError::Database`].
pub async fn register(store: &dyn VideoStore, body: NewVideo) -> Result<VideoRecord, VideoError> {
    let project_id = non_blank(body.project_id).ok_or(VideoError::MissingField("projectId"))?;
    let title = non_blank(body.title);
    let record = store.create(&project_id, title.as_deref()).await?;
    info!(id = %record.id, %project_id, "video: record registered");
    Ok(record)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const VIDEO_COLUMNS: &str = "id, project_id, title, status, video_url, duration";

#[async_trait::async_trait]
impl VideoStore for PgVideoStore {
    async fn create(&self, project_id: &str, title: Option<&str>) -> Result<VideoRecord, VideoError> {
        let sql = format!(
            "INSERT INTO video_generations (project_id, title, status) VALUES ($1, $2, $3) RETURNING {VIDEO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(project_id)
            .bind(title)
            .bind(STATUS_PENDING)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => VideoError::Duplicate(project_id.to_string()),
                other => VideoError::Database(other),
            })?;
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, VideoError> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM video_generations WHERE id = $1");
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(VideoRecord::from))
    }

    async fn find_by_project_id(&self, project_id: &str) -> Result<Option<VideoRecord>, VideoError> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM video_generations WHERE project_id = $1");
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(VideoRecord::from))
    }

    async fn update(&self, id: Uuid, update: &VideoUpdate) -> Result<VideoRecord, VideoError> {
        let sql = format!(
            "UPDATE video_generations
             SET status = $2,
                 video_url = COALESCE($3, video_url),
                 duration = COALESCE($4, duration),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {VIDEO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .bind(&update.status)
            .bind(update.video_url.as_deref())
            .bind(update.duration)
            .fetch_optional(&self.pool)
            .await?;
        row.map(VideoRecord::from).ok_or(VideoError::NotFound(id))
    }
}

#[cfg(test)]
#[path = "video_test.rs"]
mod tests;
