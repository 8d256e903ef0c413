// Pass-through proxy to the origin API.
// Anything outside the cached allow-list is forwarded with its method, path, headers, and body.

use axum::{
    Json,
    body::to_bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use super::AppState;

/// Largest request body accepted for forwarding.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-level headers that must not be forwarded in either direction.
const HOP_BY_HOP: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::CONTENT_LENGTH,
];

/// Forward a request to the origin and relay its status, headers, and body.
pub async fn forward(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(err) => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "message": format!("request body rejected: {}", err) })),
            )
                .into_response();
        }
    };

    let mut headers = strip_hop_by_hop(parts.headers);
    headers.remove(header::HOST);
    // Ask for an identity body so it can be relayed byte for byte.
    headers.remove(header::ACCEPT_ENCODING);

    debug!(method = %parts.method, path = %path_and_query, "proxying to origin");
    let response = match state
        .client
        .forward(parts.method.clone(), &path_and_query, headers, body)
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!(method = %parts.method, path = %path_and_query, error = %err, "origin request failed");
            return upstream_error(err.to_string());
        }
    };

    let status = response.status();
    let headers = strip_hop_by_hop(response.headers().clone());
    match response.bytes().await {
        Ok(body) => (status, headers, body).into_response(),
        Err(err) => {
            warn!(path = %path_and_query, error = %err, "failed reading origin response");
            upstream_error(err.to_string())
        }
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers
}

fn upstream_error(message: String) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "message": format!("origin request failed: {}", message) })),
    )
        .into_response()
}
