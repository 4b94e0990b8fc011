//! Production API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/work-orders", work_order_routes())
        .nest("/api/tasks", task_routes())
}

fn work_order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_work_order).get(handler::list_work_orders))
        .route("/{id}", get(handler::get_work_order))
        .route("/{id}/tasks", post(handler::add_task))
        .route("/{id}/rejections", post(handler::record_rejection))
}

fn task_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/start", post(handler::start_task))
        .route("/{id}/complete", post(handler::complete_task))
        .route("/{id}/fail", post(handler::fail_task))
}
