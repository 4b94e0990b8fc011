use thiserror::Error;

/// 服务器级错误 (启动与运行期故障)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("绑定端口失败: {0}")]
    Bind(std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器启动/运行的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
