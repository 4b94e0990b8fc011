//! Health API Handlers

use axum::Json;
use serde_json::{Value, json};

/// GET /healthz - 存活探针
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /readyz - 就绪探针
pub async fn readyz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
