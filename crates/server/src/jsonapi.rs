//! JSON:API document envelopes.

use axum::Json;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use filestore_core::{FileStore, FileStoreDraft};
use serde::{Deserialize, Serialize};

pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Resource type name of a file store.
pub const FILE_STORE_TYPE: &str = "file-stores";

/// A single resource object.
#[derive(Debug, Serialize, Deserialize)]
pub struct Resource<T> {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attributes: T,
}

/// Top-level document with primary data.
#[derive(Debug, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

impl Resource<FileStore> {
    pub fn file_store(store: FileStore) -> Self {
        Self {
            kind: FILE_STORE_TYPE.to_string(),
            id: Some(store.id.to_string()),
            attributes: store,
        }
    }
}

/// Response wrapper that sets the JSON:API content type.
pub struct JsonApi<T>(pub T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, JSON_API_CONTENT_TYPE)], Json(self.0)).into_response()
    }
}

pub fn one(store: FileStore) -> JsonApi<Document<Resource<FileStore>>> {
    JsonApi(Document {
        data: Resource::file_store(store),
    })
}

pub fn many(stores: Vec<FileStore>) -> JsonApi<Document<Vec<Resource<FileStore>>>> {
    JsonApi(Document {
        data: stores.into_iter().map(Resource::file_store).collect(),
    })
}

/// Parse a request document carrying a file-store draft.
pub fn parse_draft(bytes: &[u8]) -> Result<FileStoreDraft, String> {
    let doc: Document<Resource<FileStoreDraft>> =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid document: {e}"))?;
    if doc.data.kind != FILE_STORE_TYPE {
        return Err(format!(
            "resource type must be [{FILE_STORE_TYPE}], got [{}]",
            doc.data.kind
        ));
    }
    Ok(doc.data.attributes)
}
