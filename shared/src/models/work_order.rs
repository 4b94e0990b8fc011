//! Work Order Model
//!
//! The production-side aggregate: one work order per customer order, its
//! station-level tasks and its recorded rejections. Also carries
//! [`ProductionOutcome`], the notification contract the coordinator consumes.

use serde::{Deserialize, Serialize};

use super::station::StationType;

/// Work order state
///
/// OPEN -> IN_PROGRESS -> DONE, with REJECTED reachable from either
/// non-terminal state. DONE and REJECTED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderState {
    #[default]
    Open,
    InProgress,
    Done,
    Rejected,
}

impl WorkOrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Rejected)
    }
}

impl std::fmt::Display for WorkOrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

/// Work task state
///
/// TODO -> DOING -> DONE, with FAILED reachable from TODO or DOING.
/// DONE and FAILED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    #[default]
    Todo,
    Doing,
    Done,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Todo => "TODO",
            Self::Doing => "DOING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Work task type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Build,
    Pack,
    Dispatch,
    Qc,
}

/// Station-level unit of work within a work order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkTask {
    pub id: String,
    pub work_order_id: String,
    /// Assigned station (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    pub task_type: TaskType,
    pub state: TaskState,
    /// Worker identifier (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Unix milliseconds, set on TODO -> DOING
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Unix milliseconds, set on completion or failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    /// Set only when state = FAILED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Recorded quality/process failure
///
/// Append-only. Recording one forces the owning work order to REJECTED.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rejection {
    pub id: String,
    pub work_order_id: String,
    pub category: String,
    pub details: String,
    /// Unix milliseconds
    pub created_at: i64,
}

/// Production aggregate root - the unit of work fulfilling one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    /// Order reference (weak; 1:1 cardinality enforced by the engine)
    pub order_id: String,
    pub current_stage: StationType,
    pub state: WorkOrderState,
    /// Tasks in insertion order
    pub tasks: Vec<WorkTask>,
    pub rejections: Vec<Rejection>,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

/// Create work order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderCreate {
    pub order_id: String,
}

/// Add task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkTaskCreate {
    pub task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Start task payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskStart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Fail task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFailure {
    pub reason: String,
}

/// Record rejection payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionCreate {
    pub category: String,
    pub details: String,
}

/// Production outcome notification
///
/// Emitted by the production engine when a work order reaches a terminal
/// state, consumed by the workflow coordinator. Delivery is at-least-once;
/// handlers must be idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionOutcome {
    WorkOrderCompleted {
        work_order_id: String,
        order_id: String,
    },
    WorkOrderRejected {
        work_order_id: String,
        order_id: String,
        category: String,
        details: String,
    },
}

impl ProductionOutcome {
    /// The order this outcome belongs to
    pub fn order_id(&self) -> &str {
        match self {
            Self::WorkOrderCompleted { order_id, .. } => order_id,
            Self::WorkOrderRejected { order_id, .. } => order_id,
        }
    }

    /// The work order that produced this outcome
    pub fn work_order_id(&self) -> &str {
        match self {
            Self::WorkOrderCompleted { work_order_id, .. } => work_order_id,
            Self::WorkOrderRejected { work_order_id, .. } => work_order_id,
        }
    }
}
