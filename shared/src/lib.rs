//! Shared types for the fulfillment services
//!
//! Common types used across the service crates: domain models for the order
//! and production aggregates, the workflow error taxonomy, and the unified
//! API response envelope.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Error re-exports (for convenient access)
pub use error::{WorkflowError, WorkflowResult};
pub use response::ApiResponse;
