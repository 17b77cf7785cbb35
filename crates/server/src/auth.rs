//! Identity extraction and request correlation middleware.
//!
//! The fronting gateway verifies the caller's JWT before the request reaches
//! this service, so claims are decoded here without signature verification.

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use filestore_core::Identity;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and potential log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Request and response header carrying the trace ID.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value.
    /// The value is truncated to MAX_TRACE_ID_LEN characters and non-printable characters removed.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Claims read from the gateway-verified token.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "custom:tenant_id")]
    tenant_id: String,
    #[serde(rename = "cognito:username", default)]
    username: Option<String>,
}

/// Authenticated request extension.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub identity: Identity,
}

/// Extract bearer token from Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive. A bare token
/// without scheme is accepted as well.
fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();
    if value.len() >= 7 && value[..7].eq_ignore_ascii_case("bearer ") {
        Some(value[7..].trim())
    } else if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Decode the identity claims of a JWT without verifying its signature.
pub fn decode_identity(token: &str) -> Option<Identity> {
    let mut parts = token.split('.');
    let (_header, payload) = (parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    if claims.sub.is_empty() || claims.tenant_id.is_empty() {
        return None;
    }

    let identity = Identity::new(claims.tenant_id, claims.sub);
    Some(match claims.username {
        Some(username) => identity.with_username(username),
        None => identity,
    })
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Middleware that resolves the caller identity and sets up trace context.
///
/// Requests without a decodable identity pass through unauthenticated;
/// handlers that need one call [`require_auth`].
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(&req);
    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        tenant_id = tracing::field::Empty,
        user_id = tracing::field::Empty,
    );
    let header = HeaderValue::from_str(trace_id.as_str()).ok();
    req.extensions_mut().insert(trace_id);

    if let Some(identity) = extract_bearer_token(&req).and_then(decode_identity) {
        span.record("tenant_id", identity.tenant.as_str());
        span.record("user_id", identity.user_id.as_str());
        req.extensions_mut().insert(AuthenticatedUser { identity });
    }

    let mut response = next.run(req).instrument(span).await;
    if let Some(header) = header {
        response.headers_mut().insert(TRACE_ID_HEADER, header);
    }
    response
}

/// Require an authenticated caller.
pub fn require_auth(req: &Request) -> ApiResult<&AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
}

/// Get the trace ID from request extensions.
pub fn get_trace_id(req: &Request) -> Option<&TraceId> {
    req.extensions().get::<TraceId>()
}
