use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use leadgen_core::{AppConfig, Environment};
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Header carrying the caller's client key.
pub const API_KEY_HEADER: &str = "apikey";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Client keys accepted in the `apikey` header.
#[derive(Clone)]
pub struct ApiKeyState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl std::fmt::Debug for ApiKeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyState")
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl ApiKeyState {
    /// Builds the gate from `LEADGEN_API_KEYS`.
    ///
    /// In development, an empty key list disables the gate for local
    /// iteration. In other environments an empty list fails startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if config.api_keys.is_empty() {
            if config.env == Environment::Development {
                tracing::warn!("LEADGEN_API_KEYS not set; apikey gate disabled in development");
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "LEADGEN_API_KEYS is required outside development; provide comma-separated keys"
            );
        }

        Ok(Self::new(config.api_keys.clone()))
    }

    #[must_use]
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            api_keys: Arc::new(keys),
            enabled: true,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(Vec::new()),
            enabled: false,
        }
    }

    fn allows(&self, candidate: &str) -> bool {
        self.api_keys
            .iter()
            .any(|key| bool::from(key.as_bytes().ct_eq(candidate.as_bytes())))
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the `apikey` header when the gate is enabled.
pub async fn require_api_key(State(keys): State<ApiKeyState>, req: Request, next: Next) -> Response {
    if !keys.enabled {
        return next.run(req).await;
    }

    let presented = extract_api_key(req.headers().get(API_KEY_HEADER));

    match presented {
        Some(key) if keys.allows(key) => next.run(req).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(MiddlewareErrorBody {
                error: "missing or invalid api key",
            }),
        )
            .into_response(),
    }
}

fn extract_api_key(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
