//! Production API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    Rejection, RejectionCreate, TaskFailure, TaskStart, WorkOrder, WorkOrderCreate, WorkTask,
    WorkTaskCreate,
};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/work-orders - 创建工单
pub async fn create_work_order(
    State(state): State<ServerState>,
    Json(payload): Json<WorkOrderCreate>,
) -> AppResult<Json<WorkOrder>> {
    let work_order = state.production.create_work_order(payload)?;
    Ok(Json(work_order))
}

/// GET /api/work-orders - 获取所有工单
pub async fn list_work_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<WorkOrder>>> {
    Ok(Json(state.production.list_work_orders()))
}

/// GET /api/work-orders/:id - 获取单个工单
pub async fn get_work_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WorkOrder>> {
    let work_order = state.production.get_work_order(&id)?;
    Ok(Json(work_order))
}

/// POST /api/work-orders/:id/tasks - 添加工序
pub async fn add_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WorkTaskCreate>,
) -> AppResult<Json<WorkTask>> {
    let task = state.production.add_task(&id, payload)?;
    Ok(Json(task))
}

/// POST /api/tasks/:id/start - 开始工序
pub async fn start_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskStart>,
) -> AppResult<Json<WorkTask>> {
    let task = state.production.start_task(&id, payload)?;
    Ok(Json(task))
}

/// POST /api/tasks/:id/complete - 完成工序
pub async fn complete_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WorkTask>> {
    let task = state.production.complete_task(&id)?;
    Ok(Json(task))
}

/// POST /api/tasks/:id/fail - 工序失败
pub async fn fail_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskFailure>,
) -> AppResult<Json<WorkTask>> {
    let task = state.production.fail_task(&id, payload)?;
    Ok(Json(task))
}

/// POST /api/work-orders/:id/rejections - 记录拒收
pub async fn record_rejection(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RejectionCreate>,
) -> AppResult<Json<Rejection>> {
    let rejection = state.production.record_rejection(&id, payload)?;
    Ok(Json(rejection))
}
