//! Production workflow rules
//!
//! Task transition table and the work-order state derivation rule. Work
//! order state is never set directly by callers; it is derived from task
//! completion, or forced to REJECTED by a recorded rejection.

use shared::models::{TaskState, WorkOrderState, WorkTask};

/// Whether `from -> to` is a legal task transition
pub fn is_task_transition_allowed(from: TaskState, to: TaskState) -> bool {
    use TaskState::*;
    matches!(
        (from, to),
        (Todo, Doing) | (Todo, Done) | (Todo, Failed) | (Doing, Done) | (Doing, Failed)
    )
}

/// Derive the work-order state from its tasks
///
/// - every task DONE (and at least one task) => DONE
/// - any task past TODO => IN_PROGRESS
/// - otherwise the current state stands
///
/// Only meaningful for non-terminal work orders; REJECTED is forced by
/// rejections, never derived here.
pub fn derive_state(current: WorkOrderState, tasks: &[WorkTask]) -> WorkOrderState {
    if !tasks.is_empty() && tasks.iter().all(|t| t.state == TaskState::Done) {
        return WorkOrderState::Done;
    }
    if tasks.iter().any(|t| t.state != TaskState::Todo) {
        return WorkOrderState::InProgress;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TaskType;

    fn task(state: TaskState) -> WorkTask {
        WorkTask {
            id: "t".to_string(),
            work_order_id: "wo".to_string(),
            station_id: None,
            task_type: TaskType::Build,
            state,
            assigned_to: None,
            started_at: None,
            finished_at: None,
            failure_reason: None,
        }
    }

    #[test]
    fn test_task_transitions() {
        use TaskState::*;
        assert!(is_task_transition_allowed(Todo, Doing));
        assert!(is_task_transition_allowed(Todo, Done));
        assert!(is_task_transition_allowed(Doing, Done));
        assert!(is_task_transition_allowed(Doing, Failed));
        assert!(!is_task_transition_allowed(Done, Doing));
        assert!(!is_task_transition_allowed(Failed, Done));
        assert!(!is_task_transition_allowed(Done, Done));
    }

    #[test]
    fn test_derive_all_done() {
        let tasks = vec![task(TaskState::Done), task(TaskState::Done)];
        assert_eq!(
            derive_state(WorkOrderState::InProgress, &tasks),
            WorkOrderState::Done
        );
    }

    #[test]
    fn test_derive_first_activity_moves_open_to_in_progress() {
        let tasks = vec![task(TaskState::Done), task(TaskState::Todo)];
        assert_eq!(
            derive_state(WorkOrderState::Open, &tasks),
            WorkOrderState::InProgress
        );
    }

    #[test]
    fn test_derive_no_tasks_keeps_current() {
        assert_eq!(
            derive_state(WorkOrderState::Open, &[]),
            WorkOrderState::Open
        );
    }

    #[test]
    fn test_derive_all_todo_keeps_current() {
        let tasks = vec![task(TaskState::Todo)];
        assert_eq!(
            derive_state(WorkOrderState::Open, &tasks),
            WorkOrderState::Open
        );
    }

    #[test]
    fn test_failed_task_does_not_complete_work_order() {
        let tasks = vec![task(TaskState::Done), task(TaskState::Failed)];
        assert_eq!(
            derive_state(WorkOrderState::InProgress, &tasks),
            WorkOrderState::InProgress
        );
    }
}
