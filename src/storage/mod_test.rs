use super::*;

#[test]
fn object_url_joins_bucket_and_path() {
    assert_eq!(
        object_url("https://proj.supabase.co", "videos", "farm/urea.mp4").unwrap().as_str(),
        "https://proj.supabase.co/storage/v1/object/videos/farm/urea.mp4"
    );
}

#[test]
fn object_url_strips_leading_slash() {
    assert_eq!(
        object_url("https://proj.supabase.co", "videos", "/a.mp4").unwrap().as_str(),
        "https://proj.supabase.co/storage/v1/object/videos/a.mp4"
    );
}

#[test]
fn object_url_encodes_segments_so_dots_stay_in_bucket() {
    let url = object_url("https://proj.supabase.co", "videos", "%2e%2e/private/secret.mp4").unwrap();
    assert!(url.path().starts_with("/storage/v1/object/videos/"), "escaped bucket: {url}");
    assert_eq!(url.path(), "/storage/v1/object/videos/%252e%252e/private/secret.mp4");
}

#[test]
fn object_url_encodes_query_and_fragment_chars() {
    let url = object_url("https://proj.supabase.co", "videos", "a?b#c.mp4").unwrap();
    assert_eq!(url.query(), None);
    assert_eq!(url.fragment(), None);
    assert_eq!(url.path(), "/storage/v1/object/videos/a%3Fb%23c.mp4");
}

#[test]
fn object_url_keeps_base_path() {
    let url = object_url("http://localhost:54321/proxy/", "videos", "a.mp4").unwrap();
    assert_eq!(url.as_str(), "http://localhost:54321/proxy/storage/v1/object/videos/a.mp4");
}

#[test]
fn object_url_rejects_bad_base() {
    assert!(matches!(object_url("not a url", "videos", "a.mp4"), Err(StorageError::Request(_))));
}

#[test]
fn not_found_on_404() {
    assert!(is_not_found(404, ""));
}

#[test]
fn not_found_on_400_with_not_found_body() {
    let body = r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#;
    assert!(is_not_found(400, body));
}

#[test]
fn other_400_is_not_not_found() {
    assert!(!is_not_found(400, r#"{"error":"invalid_jwt"}"#));
    assert!(!is_not_found(500, "not_found"));
}

#[test]
fn supabase_storage_reports_bucket() {
    let storage = SupabaseStorage::new(StorageConfig {
        base_url: "https://proj.supabase.co".into(),
        service_key: "key".into(),
        bucket: "clips".into(),
    })
    .unwrap();
    assert_eq!(storage.bucket(), "clips");
    assert_eq!(storage.object_url("x.mp4").unwrap().as_str(), "https://proj.supabase.co/storage/v1/object/clips/x.mp4");
}
