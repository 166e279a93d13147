//! HTTP blob store against a mock provider.
//!
//! Checks request shapes (paths, headers, bearer token), pagination and how
//! provider failures surface through the gateway.

use folio::config::UploadsConfig;
use folio::uploads::{BlobStore, HttpBlobStore, UploadError, UploadGateway};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn store(server: &MockServer) -> HttpBlobStore {
    HttpBlobStore::new(server.uri(), Some(TOKEN.to_string()))
}

fn gateway(server: &MockServer) -> UploadGateway {
    UploadGateway::new(
        Arc::new(store(server)),
        UploadsConfig::default(),
        Some("secret".to_string()),
    )
}

// ============================================================================
// put
// ============================================================================

#[tokio::test]
async fn put_sends_headers_and_reads_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/fieldnotes/cover.png"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-content-type", "image/png"))
        .and(header("x-add-random-suffix", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://store.example/fieldnotes/cover-abc123.png",
            "pathname": "fieldnotes/cover-abc123.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let object = store(&server)
        .put("fieldnotes/cover.png", "image/png", vec![1, 2, 3, 4], true)
        .await
        .unwrap();
    assert_eq!(object.pathname, "fieldnotes/cover-abc123.png");
    assert_eq!(object.url, "https://store.example/fieldnotes/cover-abc123.png");
    assert_eq!(object.size, 4);
}

#[tokio::test]
async fn put_without_token_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = HttpBlobStore::new(server.uri(), None);
    let err = store.put("a.png", "image/png", vec![1], false).await.unwrap_err();
    assert!(matches!(err, UploadError::NotConfigured(_)));
}

// ============================================================================
// delete
// ============================================================================

#[tokio::test]
async fn delete_posts_target_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete"))
        .and(body_json(json!({"urls": ["valid/path.png"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).delete_object("valid/path.png").await.unwrap();
}

#[tokio::test]
async fn delete_failure_surfaces_short_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = gateway(&server).delete_object("valid/path.png").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete file");
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn delete_empty_pathname_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server).delete_object("").await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// ============================================================================
// list
// ============================================================================

#[tokio::test]
async fn list_follows_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blobs": [{"pathname": "b.png", "url": "https://store.example/b.png", "size": 20, "uploadedAt": "2024-05-02T00:00:00Z"}],
            "hasMore": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blobs": [{"pathname": "a.png", "url": "https://store.example/a.png", "size": 10, "uploadedAt": "2024-05-01T00:00:00Z"}],
            "cursor": "page-2",
            "hasMore": true
        })))
        .mount(&server)
        .await;

    let objects = gateway(&server).list_objects(None).await.unwrap();
    let names: Vec<&str> = objects.iter().map(|o| o.pathname.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png"]);
}

#[tokio::test]
async fn list_passes_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("prefix", "fieldnotes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"blobs": []})))
        .expect(1)
        .mount(&server)
        .await;

    let objects = gateway(&server).list_objects(Some("fieldnotes/")).await.unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn list_empty_body_is_empty_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let objects = gateway(&server).list_objects(None).await.unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn list_failure_is_storage_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let err = gateway(&server).list_objects(None).await.unwrap_err();
    assert!(matches!(err, UploadError::Storage(_)));
    assert_eq!(err.to_string(), "Failed to list files");
}
