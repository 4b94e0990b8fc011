//! 订单聚合与生命周期引擎
//!
//! - [`lifecycle`] - 订单状态机转移表 (单一权威)
//! - [`number`] - 订单号生成器
//! - [`store`] - 聚合内原子读写的内存存储
//! - [`engine`] - 订单生命周期引擎 (创建、状态转移、历史审计)

pub mod engine;
pub mod lifecycle;
pub mod number;
pub mod store;

pub use engine::OrderEngine;
pub use number::OrderNumberGenerator;
pub use store::OrderStore;
