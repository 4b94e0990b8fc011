//! Production Workflow Engine
//!
//! Owns every mutation of the work-order aggregate. Work-order state is
//! derived from task completion (never set by callers); a recorded rejection
//! forces REJECTED. Terminal work orders accept no further task transitions.
//!
//! When a work order reaches a terminal state the engine publishes a
//! [`ProductionOutcome`] on a broadcast channel. The coordinator consumes
//! the channel; API callers never see it.

use shared::models::{
    ProductionOutcome, Rejection, RejectionCreate, Station, StationCreate, StationType,
    TaskFailure, TaskStart, TaskState, WorkOrder, WorkOrderCreate, WorkOrderState, WorkTask,
    WorkTaskCreate,
};
use shared::{WorkflowError, WorkflowResult};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use super::store::{StationRegistry, WorkOrderStore};
use super::workflow;

/// Outcome broadcast channel capacity
const OUTCOME_CHANNEL_CAPACITY: usize = 1024;

/// Production workflow engine
pub struct ProductionEngine {
    store: WorkOrderStore,
    stations: StationRegistry,
    outcome_tx: broadcast::Sender<ProductionOutcome>,
}

impl std::fmt::Debug for ProductionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductionEngine")
            .field("store", &"<WorkOrderStore>")
            .field("stations", &"<StationRegistry>")
            .finish()
    }
}

impl ProductionEngine {
    pub fn new() -> Self {
        let (outcome_tx, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            store: WorkOrderStore::new(),
            stations: StationRegistry::new(),
            outcome_tx,
        }
    }

    /// Subscribe to terminal-state outcome notifications
    pub fn subscribe_outcomes(&self) -> broadcast::Receiver<ProductionOutcome> {
        self.outcome_tx.subscribe()
    }

    // ========== Work orders ==========

    /// Create a work order in OPEN state at the PRODUCTION stage
    ///
    /// One work order per order: a second create for the same order_id fails
    /// with DuplicateWorkOrder.
    pub fn create_work_order(&self, payload: WorkOrderCreate) -> WorkflowResult<WorkOrder> {
        let now = chrono::Utc::now().timestamp_millis();
        let work_order = WorkOrder {
            id: Uuid::new_v4().to_string(),
            order_id: payload.order_id,
            current_stage: StationType::Production,
            state: WorkOrderState::Open,
            tasks: Vec::new(),
            rejections: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let work_order = self.store.insert(work_order)?;
        info!(
            work_order_id = %work_order.id,
            order_id = %work_order.order_id,
            "Work order created"
        );
        Ok(work_order)
    }

    /// Fetch one work order
    pub fn get_work_order(&self, work_order_id: &str) -> WorkflowResult<WorkOrder> {
        self.store
            .get(work_order_id)
            .ok_or_else(|| WorkflowError::not_found("WorkOrder", work_order_id))
    }

    /// Snapshot all work orders
    pub fn list_work_orders(&self) -> Vec<WorkOrder> {
        self.store.list()
    }

    // ========== Tasks ==========

    /// Append a TODO task to a non-terminal work order
    pub fn add_task(
        &self,
        work_order_id: &str,
        payload: WorkTaskCreate,
    ) -> WorkflowResult<WorkTask> {
        // Station is in-aggregate lookup data: validate when provided
        if let Some(station_id) = payload.station_id.as_deref() {
            let station = self
                .stations
                .get(station_id)
                .ok_or_else(|| WorkflowError::not_found("Station", station_id))?;
            if !station.active {
                return Err(WorkflowError::validation(format!(
                    "station {} is inactive",
                    station.code
                )));
            }
        }

        let task = self.store.with_work_order_mut(work_order_id, |work_order| {
            if work_order.state.is_terminal() {
                return Err(WorkflowError::TerminalState {
                    entity: "WorkOrder",
                    id: work_order.id.clone(),
                    state: work_order.state.to_string(),
                });
            }
            let task = WorkTask {
                id: Uuid::new_v4().to_string(),
                work_order_id: work_order.id.clone(),
                station_id: payload.station_id.clone(),
                task_type: payload.task_type,
                state: TaskState::Todo,
                assigned_to: payload.assigned_to.clone(),
                started_at: None,
                finished_at: None,
                failure_reason: None,
            };
            work_order.tasks.push(task.clone());
            work_order.updated_at = chrono::Utc::now().timestamp_millis();
            Ok(task)
        })?;

        self.store.register_task(&task.id, work_order_id);
        info!(
            work_order_id = %work_order_id,
            task_id = %task.id,
            task_type = ?task.task_type,
            "Task added"
        );
        Ok(task)
    }

    /// Start a task (TODO -> DOING), recording started_at and the worker
    pub fn start_task(&self, task_id: &str, payload: TaskStart) -> WorkflowResult<WorkTask> {
        let (task, _) = self.mutate_task(task_id, |task, now| {
            if !workflow::is_task_transition_allowed(task.state, TaskState::Doing) {
                return Err(WorkflowError::InvalidTransition {
                    entity: "WorkTask",
                    id: task.id.clone(),
                    from: task.state.to_string(),
                    to: TaskState::Doing.to_string(),
                });
            }
            task.state = TaskState::Doing;
            task.started_at = Some(now);
            if payload.assigned_to.is_some() {
                task.assigned_to = payload.assigned_to.clone();
            }
            Ok(())
        })?;
        Ok(task)
    }

    /// Complete a task (TODO/DOING -> DONE) and re-derive the work-order state
    ///
    /// First completion moves an OPEN work order to IN_PROGRESS; the last
    /// completion moves it to DONE and publishes WorkOrderCompleted.
    pub fn complete_task(&self, task_id: &str) -> WorkflowResult<WorkTask> {
        let (task, outcome) = self.mutate_task(task_id, |task, now| {
            if task.state.is_terminal() {
                return Err(WorkflowError::InvalidTransition {
                    entity: "WorkTask",
                    id: task.id.clone(),
                    from: task.state.to_string(),
                    to: TaskState::Done.to_string(),
                });
            }
            task.state = TaskState::Done;
            task.finished_at = Some(now);
            // A task completed straight from TODO never started explicitly
            task.started_at.get_or_insert(now);
            Ok(())
        })?;

        if let Some(outcome) = outcome {
            self.publish(outcome);
        }
        Ok(task)
    }

    /// Fail a task (TODO/DOING -> FAILED)
    ///
    /// Does not fail the work order - only a recorded rejection does.
    pub fn fail_task(&self, task_id: &str, payload: TaskFailure) -> WorkflowResult<WorkTask> {
        let (task, _) = self.mutate_task(task_id, |task, now| {
            if task.state.is_terminal() {
                return Err(WorkflowError::InvalidTransition {
                    entity: "WorkTask",
                    id: task.id.clone(),
                    from: task.state.to_string(),
                    to: TaskState::Failed.to_string(),
                });
            }
            task.state = TaskState::Failed;
            task.finished_at = Some(now);
            task.started_at.get_or_insert(now);
            task.failure_reason = Some(payload.reason.clone());
            Ok(())
        })?;
        Ok(task)
    }

    // ========== Rejections ==========

    /// Record a rejection, forcing the work order to REJECTED
    pub fn record_rejection(
        &self,
        work_order_id: &str,
        payload: RejectionCreate,
    ) -> WorkflowResult<Rejection> {
        let (rejection, outcome) =
            self.store.with_work_order_mut(work_order_id, |work_order| {
                if work_order.state.is_terminal() {
                    return Err(WorkflowError::TerminalState {
                        entity: "WorkOrder",
                        id: work_order.id.clone(),
                        state: work_order.state.to_string(),
                    });
                }
                let now = chrono::Utc::now().timestamp_millis();
                let rejection = Rejection {
                    id: Uuid::new_v4().to_string(),
                    work_order_id: work_order.id.clone(),
                    category: payload.category.clone(),
                    details: payload.details.clone(),
                    created_at: now,
                };
                work_order.rejections.push(rejection.clone());
                work_order.state = WorkOrderState::Rejected;
                work_order.updated_at = now;

                let outcome = ProductionOutcome::WorkOrderRejected {
                    work_order_id: work_order.id.clone(),
                    order_id: work_order.order_id.clone(),
                    category: rejection.category.clone(),
                    details: rejection.details.clone(),
                };
                Ok((rejection, outcome))
            })?;

        warn!(
            work_order_id = %work_order_id,
            category = %rejection.category,
            "Rejection recorded, work order REJECTED"
        );
        self.publish(outcome);
        Ok(rejection)
    }

    // ========== Stations ==========

    /// Register a station (unique code)
    pub fn register_station(&self, payload: StationCreate) -> WorkflowResult<Station> {
        let station = self.stations.insert(payload)?;
        info!(station_id = %station.id, code = %station.code, "Station registered");
        Ok(station)
    }

    /// Snapshot all stations
    pub fn list_stations(&self) -> Vec<Station> {
        self.stations.list()
    }

    // ========== Internals ==========

    /// Apply a task mutation under its work order's exclusive guard
    ///
    /// Guard order: task/work-order existence, work-order terminality, then
    /// the task-level check inside `f`. After `f` succeeds the work-order
    /// state is re-derived; crossing into DONE yields an outcome.
    fn mutate_task(
        &self,
        task_id: &str,
        f: impl FnOnce(&mut WorkTask, i64) -> WorkflowResult<()>,
    ) -> WorkflowResult<(WorkTask, Option<ProductionOutcome>)> {
        let work_order_id = self
            .store
            .work_order_of_task(task_id)
            .ok_or_else(|| WorkflowError::not_found("WorkTask", task_id))?;

        self.store.with_work_order_mut(&work_order_id, |work_order| {
            if work_order.state.is_terminal() {
                return Err(WorkflowError::TerminalState {
                    entity: "WorkOrder",
                    id: work_order.id.clone(),
                    state: work_order.state.to_string(),
                });
            }

            let now = chrono::Utc::now().timestamp_millis();
            let work_order_ref = work_order.id.clone();
            let order_ref = work_order.order_id.clone();

            let task = work_order
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| WorkflowError::not_found("WorkTask", task_id))?;
            f(task, now)?;
            let task = task.clone();

            let derived = workflow::derive_state(work_order.state, &work_order.tasks);
            let outcome = if derived == WorkOrderState::Done
                && work_order.state != WorkOrderState::Done
            {
                Some(ProductionOutcome::WorkOrderCompleted {
                    work_order_id: work_order_ref,
                    order_id: order_ref,
                })
            } else {
                None
            };
            work_order.state = derived;
            work_order.updated_at = now;

            Ok((task, outcome))
        })
    }

    fn publish(&self, outcome: ProductionOutcome) {
        info!(
            work_order_id = %outcome.work_order_id(),
            order_id = %outcome.order_id(),
            "Production outcome published"
        );
        // No subscribers is fine (e.g. engine used standalone in tests)
        let _ = self.outcome_tx.send(outcome);
    }
}

impl Default for ProductionEngine {
    fn default() -> Self {
        Self::new()
    }
}
