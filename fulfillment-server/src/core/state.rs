use std::sync::Arc;

use crate::coordinator::{EngineOrderTransitions, WorkflowCoordinator};
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::orders::OrderEngine;
use crate::production::ProductionEngine;

/// 服务器状态 - 持有两个引擎与协调器的共享引用
///
/// ServerState 是履约服务的核心数据结构。使用 Arc 实现浅拷贝，
/// 所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | Arc<OrderEngine> | 订单生命周期引擎 |
/// | production | Arc<ProductionEngine> | 生产工作流引擎 |
/// | coordinator | Arc<WorkflowCoordinator> | 跨聚合协调器 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单生命周期引擎
    pub orders: Arc<OrderEngine>,
    /// 生产工作流引擎
    pub production: Arc<ProductionEngine>,
    /// 工作流协调器
    pub coordinator: Arc<WorkflowCoordinator>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 协调器通过 [`EngineOrderTransitions`] 适配器访问订单引擎——
    /// 两个聚合之间只存在请求/响应边界，不共享存储。
    pub fn initialize(config: &Config) -> Self {
        let orders = Arc::new(OrderEngine::new());
        let production = Arc::new(ProductionEngine::new());
        let coordinator = Arc::new(WorkflowCoordinator::new(
            Arc::new(EngineOrderTransitions::new(orders.clone())),
            config.coordinator_max_retries,
            config.coordinator_retry_base_ms,
        ));

        Self {
            config: config.clone(),
            orders,
            production,
            coordinator,
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 开始服务前调用。
    ///
    /// 启动的任务：
    /// - 协调器监听器：消费生产结果通知并推进订单状态
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let rx = self.production.subscribe_outcomes();
        let coordinator = self.coordinator.clone();
        tasks.spawn("coordinator-listener", TaskKind::Listener, |token| async move {
            coordinator.run_listener(rx, token).await;
        });
    }
}
