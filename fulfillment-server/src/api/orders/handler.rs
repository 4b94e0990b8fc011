//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Order, OrderCreate, OrderStatusHistory, OrderTransition};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.create(payload)?;
    Ok(Json(order))
}

/// GET /api/orders - 获取所有订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list()))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get(&id)?;
    Ok(Json(order))
}

/// GET /api/orders/:id/history - 获取订单状态历史
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderStatusHistory>>> {
    let history = state.orders.history(&id)?;
    Ok(Json(history))
}

/// POST /api/orders/:id/transition - 请求状态转移
pub async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderTransition>,
) -> AppResult<Json<Order>> {
    let order = state.orders.transition(&id, payload)?;
    Ok(Json(order))
}
