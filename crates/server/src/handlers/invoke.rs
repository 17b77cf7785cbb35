//! Internal RPC endpoint used by sibling services.
//!
//! Every call answers HTTP 200, including undecodable requests; the outcome
//! travels in the envelope's `status_code`. Callers name the tenant explicitly, so this route sits
//! outside the identity middleware's requirements and must only be reachable
//! from the internal network.

use crate::error::ApiError;
use crate::metrics::record_invoke;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use filestore_core::{FileClass, FileStoreId};
use filestore_registry::RegistryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

pub const GET_FILE_STORE_BY_ID: &str = "get_file_store_by_id";
pub const GET_FILE_STORE_BY_CLASS: &str = "get_file_store_by_class";

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub method_name: String,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct InvokeResponse {
    pub status_code: u16,
    pub error_message: String,
    /// Serialized JSON of the result, or empty on failure.
    pub body: String,
}

impl InvokeResponse {
    fn ok(body: String) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            error_message: String::new(),
            body,
        }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error_message: message.into(),
            body: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetByIdParameters {
    file_store_id: String,
    tenant_id: String,
}

#[derive(Debug, Deserialize)]
struct GetByClassParameters {
    tenant: String,
    #[serde(rename = "class")]
    file_class: String,
}

enum InvokeError {
    Parameters(String),
    Registry(RegistryError),
    Encode(String),
}

impl From<RegistryError> for InvokeError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

fn parameters<T: DeserializeOwned>(value: Value) -> Result<T, InvokeError> {
    serde_json::from_value(value).map_err(|e| InvokeError::Parameters(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<String, InvokeError> {
    serde_json::to_string(value).map_err(|e| InvokeError::Encode(e.to_string()))
}

async fn get_by_id(state: &AppState, params: Value) -> Result<String, InvokeError> {
    let params: GetByIdParameters = parameters(params)?;
    tracing::Span::current().record("tenant_id", params.tenant_id.as_str());
    let id = FileStoreId::parse(&params.file_store_id).map_err(RegistryError::from)?;
    let store = state.registry.get_by_id(&params.tenant_id, &id).await?;
    encode(&store)
}

async fn get_by_class(state: &AppState, params: Value) -> Result<String, InvokeError> {
    let params: GetByClassParameters = parameters(params)?;
    tracing::Span::current().record("tenant_id", params.tenant.as_str());
    let class = FileClass::parse(&params.file_class).map_err(RegistryError::from)?;
    let stores = state.registry.get_by_class(&params.tenant, class).await?;
    encode(&stores)
}

async fn dispatch(state: &AppState, request: InvokeRequest) -> InvokeResponse {
    let result = match request.method_name.as_str() {
        GET_FILE_STORE_BY_ID => get_by_id(state, request.parameters).await,
        GET_FILE_STORE_BY_CLASS => get_by_class(state, request.parameters).await,
        _ => {
            record_invoke("unknown", StatusCode::NOT_IMPLEMENTED.as_u16());
            return InvokeResponse::error(StatusCode::NOT_IMPLEMENTED, "method_name is unknown");
        }
    };

    let response = match result {
        Ok(body) => InvokeResponse::ok(body),
        Err(InvokeError::Parameters(message)) => {
            InvokeResponse::error(StatusCode::UNPROCESSABLE_ENTITY, message)
        }
        Err(InvokeError::Registry(e)) => {
            let e = ApiError::from(e);
            tracing::warn!(code = e.code(), error = %e, "Invoke failed");
            InvokeResponse::error(e.status_code(), e.to_string())
        }
        Err(InvokeError::Encode(message)) => {
            tracing::error!(error = %message, "Failed to encode invoke result");
            InvokeResponse::error(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    };
    record_invoke(&request.method_name, response.status_code);
    response
}

/// POST /internal/v1/invoke
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<InvokeResponse> {
    let request: InvokeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Undecodable invoke request");
            record_invoke("invalid", StatusCode::BAD_REQUEST.as_u16());
            return Json(InvokeResponse::error(
                StatusCode::BAD_REQUEST,
                format!("invalid invoke request: {e}"),
            ));
        }
    };

    let span = tracing::info_span!(
        "invoke",
        method = %request.method_name,
        tenant_id = tracing::field::Empty,
    );
    Json(dispatch(&state, request).instrument(span).await)
}
