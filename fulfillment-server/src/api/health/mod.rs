//! Health API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/healthz", get(handler::healthz))
        .route("/readyz", get(handler::readyz))
}
