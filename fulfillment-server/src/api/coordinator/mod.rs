//! Coordinator API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coordinator", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/outcomes", post(handler::apply_outcome))
        .route("/dead-letters", get(handler::dead_letters))
}
