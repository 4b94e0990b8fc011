//! 统一错误处理
//!
//! 提供 HTTP 层错误类型并负责把 [`WorkflowError`] 映射为响应：
//!
//! | WorkflowError | HTTP | code |
//! |---------------|------|------|
//! | Validation | 400 | E0002 |
//! | NotFound | 404 | E0003 |
//! | DuplicateWorkOrder / Conflict | 409 | E0004 |
//! | InvalidTransition / TerminalState | 422 | E0005 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 处理器里直接 ? 传播引擎错误
//! let order = state.orders.create(payload)?;
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ApiResponse, WorkflowError};
use tracing::error;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// 业务规则违反 (422)
    BusinessRule(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
        };

        let body = Json(ApiResponse::<()>::error(code, message));

        (status, body).into_response()
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Validation(_) => AppError::Validation(message),
            WorkflowError::NotFound { .. } => AppError::NotFound(message),
            WorkflowError::InvalidTransition { .. } | WorkflowError::TerminalState { .. } => {
                AppError::BusinessRule(message)
            }
            WorkflowError::DuplicateWorkOrder { .. } | WorkflowError::Conflict { .. } => {
                AppError::Conflict(message)
            }
        }
    }
}
