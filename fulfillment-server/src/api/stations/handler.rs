//! Station API Handlers

use axum::{Json, extract::State};
use shared::models::{Station, StationCreate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/stations - 注册工位
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StationCreate>,
) -> AppResult<Json<Station>> {
    let station = state.production.register_station(payload)?;
    Ok(Json(station))
}

/// GET /api/stations - 获取所有工位
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Station>>> {
    Ok(Json(state.production.list_stations()))
}
