//! Common test utilities: a router over SQLite, memory channels and a static
//! admin list.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use filestore_core::config::AppConfig;
use filestore_metadata::{FileStoreRepo, SqliteStore};
use filestore_notify::MemoryBackend;
use filestore_registry::{AdminGate, LogEventSink, Registry, StaticGroupResolver};
use filestore_server::{AppState, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN: &str = "admin-user";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub channels: Arc<MemoryBackend>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let repo: Arc<dyn FileStoreRepo> = Arc::new(
            SqliteStore::new(temp_dir.path().join("file-stores.db"))
                .await
                .expect("Failed to create metadata store"),
        );
        let channels = Arc::new(MemoryBackend::new());

        let mut config = AppConfig::for_testing();
        modifier(&mut config);

        let registry = Registry::new(
            repo,
            channels.clone(),
            Arc::new(LogEventSink),
            config.server.project.clone(),
        );
        let gate = AdminGate::new(Arc::new(StaticGroupResolver::new([ADMIN])));

        filestore_server::metrics::register_metrics();
        let state = AppState::new(config, registry, gate);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            channels,
            _temp_dir: temp_dir,
        }
    }
}

/// An unsigned token carrying the gateway claims.
pub fn token_for(tenant: &str, user: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = json!({
        "sub": user,
        "custom:tenant_id": tenant,
        "cognito:username": format!("{user}-name"),
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}

/// Request document for a store of `class`.
pub fn store_document(class: &str, name: Option<&str>) -> Value {
    let mut attributes = json!({
        "bucket": "b1",
        "folderPrefix": "in/",
        "storeType": {"fileClass": class, "fileFormats": ["pxf", "xml"]},
        "accessRoleArn": "arn:aws:iam::00000:role/abc",
    });
    if let Some(name) = name {
        attributes["name"] = json!(name);
    }
    json!({"data": {"type": "file-stores", "attributes": attributes}})
}

/// Send a request and decode the JSON response.
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/vnd.api+json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
