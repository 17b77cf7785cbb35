//! File-store resource endpoints.

use crate::auth::{get_trace_id, require_auth};
use crate::error::{ApiError, ApiResult};
use crate::jsonapi::{self, parse_draft};
use crate::state::AppState;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use filestore_core::{FileStoreDraft, FileStoreId};
use filestore_registry::RegistryError;
use serde::Deserialize;

/// Maximum accepted request document size.
const MAX_BODY_SIZE: usize = 256 * 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFileStoresQuery {
    pub file_class: Option<String>,
}

fn parse_id(id: &str) -> ApiResult<FileStoreId> {
    Ok(FileStoreId::parse(id).map_err(RegistryError::from)?)
}

async fn read_draft(req: Request) -> ApiResult<FileStoreDraft> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::InvalidBody(format!("failed to read body: {e}")))?;
    parse_draft(&bytes).map_err(ApiError::InvalidBody)
}

/// POST /v1/file-stores - Create a file store for the caller's tenant.
pub async fn create_file_store(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let identity = require_auth(&req)?.identity.clone();
    let trace_id = get_trace_id(&req).cloned().unwrap_or_default();
    state.gate.require_admin(&identity).await?;

    let draft = read_draft(req).await?;
    let store = state.registry.create(&identity, draft).await?;
    tracing::info!(
        trace_id = %trace_id,
        file_store_id = %store.id,
        "File store created"
    );

    Ok((StatusCode::CREATED, jsonapi::one(store)))
}

/// GET /v1/file-stores - List the tenant's stores, optionally by class.
pub async fn list_file_stores(
    State(state): State<AppState>,
    Query(query): Query<ListFileStoresQuery>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_auth(&req)?.identity.tenant.clone();

    let stores = match query.file_class.as_deref() {
        Some(class) => state.registry.get_by_class_name(&tenant, class).await?,
        None => state.registry.get_all_for_tenant(&tenant).await?,
    };
    Ok(jsonapi::many(stores))
}

/// GET /v1/file-stores/{id}
pub async fn get_file_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_auth(&req)?.identity.tenant.clone();
    let id = parse_id(&id)?;

    let store = state.registry.get_by_id(&tenant, &id).await?;
    Ok(jsonapi::one(store))
}

/// PATCH /v1/file-stores/{id} - Update mutable fields of a store.
pub async fn update_file_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let identity = require_auth(&req)?.identity.clone();
    let trace_id = get_trace_id(&req).cloned().unwrap_or_default();
    state.gate.require_admin(&identity).await?;
    let id = parse_id(&id)?;

    let draft = read_draft(req).await?;
    let store = state
        .registry
        .update(&identity.tenant, draft, &id, &identity.user_id)
        .await?;
    tracing::info!(trace_id = %trace_id, file_store_id = %id, "File store updated");
    Ok(jsonapi::one(store))
}

/// DELETE /v1/file-stores/{id}
pub async fn delete_file_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    let identity = require_auth(&req)?.identity.clone();
    let trace_id = get_trace_id(&req).cloned().unwrap_or_default();
    state.gate.require_admin(&identity).await?;
    let id = parse_id(&id)?;

    state.registry.delete(&identity.tenant, &id).await?;
    tracing::info!(trace_id = %trace_id, file_store_id = %id, "File store deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/buckets/{bucket}/file-stores - Stores sharing a bucket.
pub async fn list_bucket_file_stores(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_auth(&req)?.identity.tenant.clone();

    let stores = state
        .registry
        .get_by_tenant_and_bucket(&tenant, &bucket)
        .await?;
    Ok(jsonapi::many(stores))
}
