use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::sesamo::GIT_COMMIT_HASH;

// axum handler for health
pub async fn health() -> impl IntoResponse {
    let body = Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": GIT_COMMIT_HASH,
    }));

    let short_hash = GIT_COMMIT_HASH.get(..7).unwrap_or_default();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{short_hash}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )) {
        headers.insert("X-App", value);
    }

    (headers, body)
}
