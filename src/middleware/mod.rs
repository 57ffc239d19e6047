use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::{Error, Result, SharedState};

// Stamped bodies are small JSON documents; anything past this is rejected.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Artificial latency in front of every request, so frontends get to see
/// their loading states.
pub async fn delay(
    State(app_state): State<SharedState>,
    req: Request,
    next: Next,
) -> impl IntoResponse {
    let delay_ms = app_state.config.delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    next.run(req).await
}

/// Write methods get their JSON bodies stamped before routing: POST sets
/// `createdAt` and `updatedAt`, PATCH and PUT refresh `updatedAt`. Non-JSON
/// and non-object bodies pass through untouched.
pub async fn stamp_write_timestamps(req: Request, next: Next) -> Result<impl IntoResponse> {
    let stamp_created = req.method() == Method::POST;
    let is_write =
        stamp_created || req.method() == Method::PATCH || req.method() == Method::PUT;
    if !is_write || !has_json_body(&req) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| Error::BadRequest("Invalid request body".to_string()))?;

    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut obj)) => {
            let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
            if stamp_created {
                obj.insert("createdAt".to_string(), now.clone());
            }
            obj.insert("updatedAt".to_string(), now);
            serde_json::to_vec(&Value::Object(obj))?.into()
        }
        _ => bytes,
    };

    // The body length changed; let hyper recompute it.
    parts.headers.remove(header::CONTENT_LENGTH);

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}

fn has_json_body(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}
