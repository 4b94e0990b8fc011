//! Coordinator API Handlers
//!
//! External replay entry point for at-least-once outcome delivery, and the
//! operator view over dead-lettered outcomes.

use axum::{Json, extract::State, http::HeaderMap};
use shared::ApiResponse;
use shared::models::{Order, ProductionOutcome};

use crate::coordinator::DeadLetter;
use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/coordinator/outcomes - 回放生产结果通知
///
/// The actor echoes the gateway correlation id (`system/<request-id>`) into
/// the order history's `changed_by`.
pub async fn apply_outcome(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(outcome): Json<ProductionOutcome>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let actor = match headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        Some(request_id) => format!("system/{}", request_id),
        None => "system".to_string(),
    };

    let order = state.coordinator.on_outcome(&outcome, &actor).await?;
    Ok(Json(ApiResponse::ok_with_message(order, "Outcome applied")))
}

/// GET /api/coordinator/dead-letters - 获取死信列表
pub async fn dead_letters(State(state): State<ServerState>) -> AppResult<Json<Vec<DeadLetter>>> {
    Ok(Json(state.coordinator.dead_letters()))
}
