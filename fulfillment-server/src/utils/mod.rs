//! 工具模块 - 错误映射与日志
//!
//! # 内容
//!
//! - [`AppError`] - HTTP 层应用错误类型
//! - [`AppResult`] - 处理器 Result 别名
//! - 日志初始化工具

pub mod error;
pub mod logger;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
