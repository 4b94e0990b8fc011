//! Workflow error taxonomy
//!
//! One error enum shared by both engines and the coordinator:
//! - [`WorkflowError::Validation`] - malformed input (empty item list, bad quantity)
//! - [`WorkflowError::NotFound`] - unknown aggregate or child id
//! - [`WorkflowError::InvalidTransition`] - transition not permitted from the current state
//! - [`WorkflowError::TerminalState`] - mutation attempted on a terminal aggregate
//! - [`WorkflowError::DuplicateWorkOrder`] - second work order for the same order
//! - [`WorkflowError::Conflict`] - cross-aggregate divergence the coordinator cannot resolve
//!
//! Validation and not-found errors surface immediately to the caller.
//! Invalid-transition and terminal-state errors are client errors (the caller
//! mis-sequenced operations). Conflict is operator-visible and never swallowed.

use thiserror::Error;

/// Unified workflow error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Transition not permitted from the current state
    #[error("Invalid transition: {entity} {id} cannot go from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        to: String,
    },

    /// Mutation attempted on a terminal aggregate
    #[error("{entity} {id} is terminal ({state}), no further transitions accepted")]
    TerminalState {
        entity: &'static str,
        id: String,
        state: String,
    },

    /// 1:1 order/work-order invariant violation
    #[error("Work order already exists for order {order_id}")]
    DuplicateWorkOrder { order_id: String },

    /// Cross-aggregate divergence detected by the coordinator
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl WorkflowError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a NotFound error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
