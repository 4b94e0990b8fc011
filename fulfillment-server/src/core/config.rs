/// 服务器配置 - 履约服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，未设置时仅输出到控制台 |
/// | COORDINATOR_MAX_RETRIES | 3 | 协调器瞬态失败重试次数 |
/// | COORDINATOR_RETRY_BASE_MS | 200 | 协调器重试基准延迟(毫秒，指数退避) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 COORDINATOR_MAX_RETRIES=5 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 协调器瞬态失败最大重试次数
    pub coordinator_max_retries: u32,
    /// 协调器重试基准延迟 (毫秒，指数退避)
    pub coordinator_retry_base_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            coordinator_max_retries: std::env::var("COORDINATOR_MAX_RETRIES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3),
            coordinator_retry_base_ms: std::env::var("COORDINATOR_RETRY_BASE_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(200),
        }
    }

    /// 使用自定义端口覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
