use super::*;
use crate::state::test_helpers::MemoryVideoStore;

fn payload(project_id: Option<&str>, status: Option<&str>) -> WebhookPayload {
    WebhookPayload {
        project_id: project_id.map(str::to_owned),
        status: status.map(str::to_owned),
        download_url: None,
        duration: None,
    }
}

// =============================================================================
// validate_webhook
// =============================================================================

#[test]
fn validate_requires_project_id() {
    let err = validate_webhook(payload(None, Some("completed"))).unwrap_err();
    assert!(matches!(err, VideoError::MissingField("projectId")));
}

#[test]
fn validate_rejects_blank_status() {
    let err = validate_webhook(payload(Some("p1"), Some("   "))).unwrap_err();
    assert!(matches!(err, VideoError::MissingField("status")));
}

#[test]
fn validate_normalizes_status_and_url() {
    let mut body = payload(Some(" p1 "), Some("Completed"));
    body.download_url = Some("  ".into());
    body.duration = Some(42.5);
    let (project_id, update) = validate_webhook(body).unwrap();
    assert_eq!(project_id, "p1");
    assert_eq!(update.status, "completed");
    assert_eq!(update.video_url, None);
    assert_eq!(update.duration, Some(42.5));
}

#[test]
fn validate_rejects_negative_duration() {
    let mut body = payload(Some("p1"), Some("completed"));
    body.duration = Some(-1.0);
    assert!(matches!(validate_webhook(body), Err(VideoError::InvalidField { field: "duration", .. })));
}

#[test]
fn webhook_payload_reads_camel_case() {
    let body: WebhookPayload = serde_json::from_str(
        r#"{"projectId":"abc","status":"completed","downloadUrl":"https://cdn/x.mp4","duration":12}"#,
    )
    .unwrap();
    assert_eq!(body.project_id.as_deref(), Some("abc"));
    assert_eq!(body.download_url.as_deref(), Some("https://cdn/x.mp4"));
    assert_eq!(body.duration, Some(12.0));
}

// =============================================================================
// apply_webhook
// =============================================================================

#[tokio::test]
async fn apply_webhook_updates_matching_record() {
    let store = MemoryVideoStore::with_record("proj-1");
    let mut body = payload(Some("proj-1"), Some("completed"));
    body.download_url = Some("https://cdn.example/v.mp4".into());
    body.duration = Some(30.0);

    let record = apply_webhook(&store, body).await.unwrap();
    assert_eq!(record.status, "completed");
    assert_eq!(record.video_url.as_deref(), Some("https://cdn.example/v.mp4"));
    assert_eq!(record.duration, Some(30.0));
}

#[tokio::test]
async fn apply_webhook_keeps_url_when_absent() {
    let store = MemoryVideoStore::with_record("proj-1");
    let mut first = payload(Some("proj-1"), Some("completed"));
    first.download_url = Some("https://cdn.example/v.mp4".into());
    apply_webhook(&store, first).await.unwrap();

    let record = apply_webhook(&store, payload(Some("proj-1"), Some("archived")))
        .await
        .unwrap();
    assert_eq!(record.status, "archived");
    assert_eq!(record.video_url.as_deref(), Some("https://cdn.example/v.mp4"));
}

#[tokio::test]
async fn apply_webhook_unknown_project() {
    let store = MemoryVideoStore::with_record("proj-1");
    let err = apply_webhook(&store, payload(Some("other"), Some("completed")))
        .await
        .unwrap_err();
    assert!(matches!(err, VideoError::ProjectNotFound(ref p) if p == "other"));
}

#[tokio::test]
async fn apply_webhook_surfaces_update_failure() {
    let store = MemoryVideoStore { fail_updates: true, ..MemoryVideoStore::with_record("proj-1") };
    let err = apply_webhook(&store, payload(Some("proj-1"), Some("failed")))
        .await
        .unwrap_err();
    assert!(matches!(err, VideoError::Database(_)));
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_creates_pending_record() {
    let store = MemoryVideoStore::default();
    let record = register(&store, NewVideo { project_id: Some("p9".into()), title: Some(" Soil health ".into()) })
        .await
        .unwrap();
    assert_eq!(record.project_id, "p9");
    assert_eq!(record.title.as_deref(), Some("Soil health"));
    assert_eq!(record.status, STATUS_PENDING);
    assert!(store.get(record.id).await.unwrap().is_some());
}

#[tokio::test]
async fn register_rejects_duplicate_project() {
    let store = MemoryVideoStore::with_record("p9");
    let err = register(&store, NewVideo { project_id: Some("p9".into()), title: None })
        .await
        .unwrap_err();
    assert!(matches!(err, VideoError::Duplicate(_)));
}

#[tokio::test]
async fn register_requires_project_id() {
    let store = MemoryVideoStore::default();
    let err = register(&store, NewVideo::default()).await.unwrap_err();
    assert!(matches!(err, VideoError::MissingField("projectId")));
}

#[test]
fn record_serializes_camel_case() {
    let record = crate::state::test_helpers::dummy_record("p1");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["projectId"], "p1");
    assert_eq!(json["status"], "pending");
    assert!(json["videoUrl"].is_null());
}
