//! Fulfillment Server - 订单履约核心服务
//!
//! # 架构概述
//!
//! 本模块是履约服务的主入口，提供以下核心功能：
//!
//! - **订单生命周期引擎** (`orders`): 订单状态机、历史审计、订单号生成
//! - **生产工作流引擎** (`production`): 工单/工序状态机、拒收记录
//! - **工作流协调器** (`coordinator`): 生产结果到订单状态的幂等对账
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! fulfillment-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── orders/        # 订单聚合 + 生命周期引擎
//! ├── production/    # 生产聚合 + 工作流引擎
//! ├── coordinator/   # 跨聚合协调器
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误映射、日志
//! ```

pub mod api;
pub mod coordinator;
pub mod core;
pub mod orders;
pub mod production;
pub mod utils;

// Re-export 公共类型
pub use coordinator::{OrderTransitions, WorkflowCoordinator};
pub use core::{Config, Server, ServerState};
pub use orders::OrderEngine;
pub use production::ProductionEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    // .env is optional; environment variables win
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____     __ _____ ____
   / __/_ __/ // __(_) / /
  / _// // / // _// / / /
 /_/  \_,_/_//_/ /_/_/_/
    "#
    );
}
