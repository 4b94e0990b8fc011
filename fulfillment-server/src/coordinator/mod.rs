//! Workflow Coordinator
//!
//! The cross-aggregate glue: consumes production outcomes and proposes the
//! matching order lifecycle transition. The two state machines belong to
//! logically separate services, so the coordinator only ever talks to the
//! order side through the [`OrderTransitions`] port - never through shared
//! storage.
//!
//! Delivery is at-least-once and the handler is idempotent: the order
//! engine's same-status no-op absorbs replays. When the two aggregates'
//! terminal states disagree (e.g. production DONE but the order already
//! CANCELLED) the coordinator surfaces a Conflict, logs it on the
//! `coordinator` target and parks the outcome in the dead-letter buffer for
//! an operator to resolve. It never silently drops an event.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use shared::models::{Order, OrderStatus, OrderTransition, ProductionOutcome};
use shared::{WorkflowError, WorkflowResult};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::orders::OrderEngine;

/// Port to the order side
///
/// The in-process deployment wires this to [`EngineOrderTransitions`]; a
/// split deployment would implement it with an HTTP client against the
/// order service.
#[async_trait]
pub trait OrderTransitions: Send + Sync {
    async fn transition(&self, order_id: &str, request: OrderTransition)
    -> WorkflowResult<Order>;
}

/// In-process adapter over the order engine
pub struct EngineOrderTransitions {
    engine: Arc<OrderEngine>,
}

impl EngineOrderTransitions {
    pub fn new(engine: Arc<OrderEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl OrderTransitions for EngineOrderTransitions {
    async fn transition(
        &self,
        order_id: &str,
        request: OrderTransition,
    ) -> WorkflowResult<Order> {
        self.engine.transition(order_id, request)
    }
}

/// An outcome the coordinator could not reconcile
#[derive(Debug, Clone, Serialize)]
pub struct DeadLetter {
    pub outcome: ProductionOutcome,
    pub error: String,
    /// Unix milliseconds
    pub parked_at: i64,
}

/// Workflow coordinator
pub struct WorkflowCoordinator {
    orders: Arc<dyn OrderTransitions>,
    /// Operator-visible buffer of unresolvable outcomes
    dead_letters: RwLock<Vec<DeadLetter>>,
    max_retries: u32,
    retry_base_ms: u64,
}

impl WorkflowCoordinator {
    pub fn new(orders: Arc<dyn OrderTransitions>, max_retries: u32, retry_base_ms: u64) -> Self {
        Self {
            orders,
            dead_letters: RwLock::new(Vec::new()),
            max_retries,
            retry_base_ms,
        }
    }

    /// React to one production outcome
    ///
    /// DONE proposes PACKED; REJECTED proposes REJECTED carrying the
    /// rejection's category/details as the history reason. Replaying the
    /// same outcome is a no-op success. Cross-aggregate divergence surfaces
    /// as Conflict and is dead-lettered.
    pub async fn on_outcome(
        &self,
        outcome: &ProductionOutcome,
        actor: &str,
    ) -> WorkflowResult<Order> {
        let (to_status, reason) = match outcome {
            ProductionOutcome::WorkOrderCompleted { work_order_id, .. } => (
                OrderStatus::Packed,
                format!("work order {} completed", work_order_id),
            ),
            ProductionOutcome::WorkOrderRejected {
                work_order_id,
                category,
                details,
                ..
            } => (
                OrderStatus::Rejected,
                format!("work order {} rejected - {}: {}", work_order_id, category, details),
            ),
        };

        let request = OrderTransition {
            to_status,
            changed_by: actor.to_string(),
            reason: Some(reason),
        };

        match self.orders.transition(outcome.order_id(), request).await {
            Ok(order) => {
                debug!(
                    target: "coordinator",
                    order_id = %order.id,
                    status = %order.status,
                    work_order_id = %outcome.work_order_id(),
                    "Production outcome reconciled"
                );
                Ok(order)
            }
            Err(
                e @ (WorkflowError::InvalidTransition { .. }
                | WorkflowError::TerminalState { .. }),
            ) => {
                // The aggregates disagree and only an operator can decide.
                let conflict = WorkflowError::conflict(format!(
                    "order {} cannot follow work order {} to {}: {}",
                    outcome.order_id(),
                    outcome.work_order_id(),
                    to_status,
                    e
                ));
                error!(
                    target: "coordinator",
                    order_id = %outcome.order_id(),
                    work_order_id = %outcome.work_order_id(),
                    attempted_status = %to_status,
                    error = %e,
                    "Cross-aggregate divergence, outcome dead-lettered"
                );
                self.dead_letters.write().push(DeadLetter {
                    outcome: outcome.clone(),
                    error: conflict.to_string(),
                    parked_at: chrono::Utc::now().timestamp_millis(),
                });
                Err(conflict)
            }
            Err(e) => Err(e),
        }
    }

    /// Snapshot the dead-letter buffer
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters.read().clone()
    }

    /// Consume the production outcome channel until cancelled
    ///
    /// Transient failures (e.g. the order not yet visible to the order side)
    /// are retried with exponential backoff; Conflict is already
    /// dead-lettered by `on_outcome` and not retried.
    pub async fn run_listener(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<ProductionOutcome>,
        token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(outcome) => self.deliver_with_retry(&outcome).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed outcomes need external replay (the
                        // /api/coordinator/outcomes endpoint)
                        error!(
                            target: "coordinator",
                            skipped,
                            "Outcome channel lagged, notifications lost"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        debug!(target: "coordinator", "Listener stopped");
    }

    async fn deliver_with_retry(&self, outcome: &ProductionOutcome) {
        for attempt in 0..=self.max_retries {
            match self.on_outcome(outcome, "system").await {
                Ok(_) => return,
                // Already dead-lettered; retrying cannot change the answer
                Err(WorkflowError::Conflict { .. }) => return,
                Err(e) => {
                    if attempt < self.max_retries {
                        let delay_ms = self.retry_base_ms * 2u64.pow(attempt);
                        warn!(
                            target: "coordinator",
                            order_id = %outcome.order_id(),
                            error = %e,
                            attempt = attempt + 1,
                            delay_ms,
                            "Outcome delivery failed, retrying"
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                    } else {
                        error!(
                            target: "coordinator",
                            order_id = %outcome.order_id(),
                            error = %e,
                            "Outcome delivery exhausted retries, dead-lettered"
                        );
                        self.dead_letters.write().push(DeadLetter {
                            outcome: outcome.clone(),
                            error: e.to_string(),
                            parked_at: chrono::Utc::now().timestamp_millis(),
                        });
                    }
                }
            }
        }
    }
}
