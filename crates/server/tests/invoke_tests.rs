//! Tests for the internal invoke endpoint.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{ADMIN, TestServer, json_request, token_for};
use filestore_core::{FileClass, FileFormat, FileStore, FileStoreDraft, Identity, StoreType};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn seed(server: &TestServer, tenant: &str, class: FileClass, name: &str) -> FileStore {
    let draft = FileStoreDraft {
        name: Some(name.to_string()),
        description: None,
        bucket: "b1".to_string(),
        folder_prefix: String::new(),
        store_type: StoreType::new(class, [FileFormat::Json]),
        access_role_arn: "arn:aws:iam::00000:role/abc".to_string(),
        metadata: Default::default(),
        writeable: None,
    };
    server
        .state
        .registry
        .create(&Identity::new(tenant, ADMIN), draft)
        .await
        .unwrap()
}

async fn invoke(server: &TestServer, request: Value) -> Value {
    let (status, body) =
        json_request(&server.router, "POST", "/internal/v1/invoke", Some(request), None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_get_file_store_by_id() {
    let server = TestServer::new().await;
    let store = seed(&server, "tenant-a", FileClass::Asrun, "asrun").await;

    let response = invoke(
        &server,
        json!({
            "method_name": "get_file_store_by_id",
            "parameters": {"file_store_id": store.id.to_string(), "tenant_id": "tenant-a"}
        }),
    )
    .await;
    assert_eq!(response["status_code"], 200);
    assert_eq!(response["error_message"], "");
    let body: FileStore = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, store);

    // The tenant in the parameters scopes the lookup.
    let response = invoke(
        &server,
        json!({
            "method_name": "get_file_store_by_id",
            "parameters": {"file_store_id": store.id.to_string(), "tenant_id": "tenant-b"}
        }),
    )
    .await;
    assert_eq!(response["status_code"], 404);
    assert_eq!(response["body"], "");
}

#[tokio::test]
async fn test_get_file_store_by_class() {
    let server = TestServer::new().await;
    seed(&server, "tenant-a", FileClass::Asrun, "one").await;
    seed(&server, "tenant-a", FileClass::Asrun, "two").await;
    seed(&server, "tenant-a", FileClass::PlaylistExport, "three").await;

    let response = invoke(
        &server,
        json!({
            "method_name": "get_file_store_by_class",
            "parameters": {"tenant": "tenant-a", "class": "ASRUN"}
        }),
    )
    .await;
    assert_eq!(response["status_code"], 200);
    let stores: Vec<FileStore> =
        serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(stores.len(), 2);
    assert!(stores.iter().all(|s| s.file_class() == FileClass::Asrun));

    let response = invoke(
        &server,
        json!({
            "method_name": "get_file_store_by_class",
            "parameters": {"tenant": "tenant-a", "class": "NOPE"}
        }),
    )
    .await;
    assert_eq!(response["status_code"], 400);
    assert_eq!(
        response["error_message"],
        "File Store type [NOPE] is not a valid FileClass"
    );
}

#[tokio::test]
async fn test_unknown_method_and_bad_parameters() {
    let server = TestServer::new().await;

    let response = invoke(
        &server,
        json!({"method_name": "drop_everything", "parameters": {}}),
    )
    .await;
    assert_eq!(response["status_code"], 501);
    assert_eq!(response["error_message"], "method_name is unknown");

    let response = invoke(
        &server,
        json!({"method_name": "get_file_store_by_id", "parameters": {"tenant_id": "t"}}),
    )
    .await;
    assert_eq!(response["status_code"], 422);
}

#[tokio::test]
async fn test_invoke_ignores_caller_identity() {
    let server = TestServer::new().await;
    let store = seed(&server, "tenant-a", FileClass::Asrun, "asrun").await;

    // A token for another tenant does not change the lookup scope.
    let token = token_for("tenant-b", ADMIN);
    let (status, response) = json_request(
        &server.router,
        "POST",
        "/internal/v1/invoke",
        Some(json!({
            "method_name": "get_file_store_by_id",
            "parameters": {"file_store_id": store.id.to_string(), "tenant_id": "tenant-a"}
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status_code"], 200);
}

#[tokio::test]
async fn test_undecodable_requests_answer_in_envelope() {
    let server = TestServer::new().await;

    let cases = [
        ("application/json", "{not json"),
        ("application/json", r#"{"parameters": {}}"#),
        ("text/plain", r#"{"method_name": 7}"#),
    ];
    for (content_type, body) in cases {
        let request = Request::builder()
            .method("POST")
            .uri("/internal/v1/invoke")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = server.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{body}");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let envelope: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope["status_code"], 400, "{body}");
        assert_eq!(envelope["body"], "");
        assert!(
            envelope["error_message"]
                .as_str()
                .unwrap()
                .starts_with("invalid invoke request")
        );
    }
}
