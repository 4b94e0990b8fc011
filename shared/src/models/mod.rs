//! Domain models
//!
//! - [`order`] - Order aggregate (order, items, status history)
//! - [`work_order`] - Production aggregate (work order, tasks, rejections)
//! - [`station`] - Production station lookup entity

pub mod order;
pub mod station;
pub mod work_order;

pub use order::{
    Order, OrderCreate, OrderItem, OrderItemCreate, OrderPriority, OrderStatus,
    OrderStatusHistory, OrderTransition,
};
pub use station::{Station, StationCreate, StationType};
pub use work_order::{
    ProductionOutcome, Rejection, RejectionCreate, TaskFailure, TaskStart, TaskState, TaskType,
    WorkOrder, WorkOrderCreate, WorkOrderState, WorkTask, WorkTaskCreate,
};
