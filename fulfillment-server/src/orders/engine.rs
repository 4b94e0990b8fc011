//! Order Lifecycle Engine
//!
//! Owns every mutation of the order aggregate:
//! - `create` validates input, snapshots catalog fields into line items,
//!   assigns a unique order number and writes the initial history entry
//! - `transition` validates the move against the lifecycle graph, applies it
//!   and appends history in one atomic unit
//!
//! Requesting the current status as target is a no-op success (no history
//! entry, no updated_at bump) so at-least-once callers can replay safely.

use rust_decimal::Decimal;
use shared::models::{
    Order, OrderCreate, OrderItem, OrderStatus, OrderStatusHistory, OrderTransition,
};
use shared::{WorkflowError, WorkflowResult};
use tracing::info;
use uuid::Uuid;

use super::lifecycle;
use super::number::OrderNumberGenerator;
use super::store::OrderStore;

/// 订单号冲突时的重新生成次数 (生成器单调递增，正常不会走到第二次)
const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Order lifecycle engine
#[derive(Debug, Default)]
pub struct OrderEngine {
    store: OrderStore,
    numbers: OrderNumberGenerator,
}

impl OrderEngine {
    pub fn new() -> Self {
        Self {
            store: OrderStore::new(),
            numbers: OrderNumberGenerator::new(),
        }
    }

    /// Create an order in NEW status
    ///
    /// Validates the payload, computes each item's `line_total` snapshot and
    /// appends the initial history entry (`from_status = None`,
    /// `changed_by = "system"`).
    pub fn create(&self, payload: OrderCreate) -> WorkflowResult<Order> {
        if payload.items.is_empty() {
            return Err(WorkflowError::validation(
                "order must contain at least one item",
            ));
        }
        for (idx, item) in payload.items.iter().enumerate() {
            if item.quantity < 1 {
                return Err(WorkflowError::validation(format!(
                    "item {} ({}): quantity must be >= 1",
                    idx, item.product_sku
                )));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(WorkflowError::validation(format!(
                    "item {} ({}): unit_price must be >= 0",
                    idx, item.product_sku
                )));
            }
        }

        let now = chrono::Utc::now().timestamp_millis();
        let order_id = Uuid::new_v4().to_string();

        let items: Vec<OrderItem> = payload
            .items
            .iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: item.product_id.clone(),
                product_sku: item.product_sku.clone(),
                product_name: item.product_name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                // Point-in-time snapshot: computed once, never recomputed
                line_total: item.unit_price * Decimal::from(item.quantity),
            })
            .collect();

        let initial_history = OrderStatusHistory {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.clone(),
            from_status: None,
            to_status: OrderStatus::New,
            changed_by: "system".to_string(),
            reason: None,
            created_at: now,
        };

        // Generate-and-check: the monotonic generator cannot collide in
        // process, the store's unique index is the backstop.
        let mut last_err = None;
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let order = Order {
                id: order_id.clone(),
                order_number: self.numbers.next(),
                customer_id: payload.customer_id.clone(),
                status: OrderStatus::New,
                priority: payload.priority,
                notes: payload.notes.clone(),
                items: items.clone(),
                history: vec![initial_history.clone()],
                created_at: now,
                updated_at: now,
            };
            match self.store.insert(order) {
                Ok(order) => {
                    info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        customer_id = %order.customer_id,
                        items = order.items.len(),
                        "Order created"
                    );
                    return Ok(order);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            WorkflowError::conflict("order number allocation failed")
        }))
    }

    /// Apply a status transition
    ///
    /// Guards, in order: same-status no-op, terminal state, lifecycle graph.
    /// On success updates the status, appends a history entry and bumps
    /// `updated_at` - all under the aggregate's exclusive guard.
    pub fn transition(&self, order_id: &str, request: OrderTransition) -> WorkflowResult<Order> {
        let order = self.store.with_order_mut(order_id, |order| {
            // Idempotent replay: requesting the current status is a no-op
            if order.status == request.to_status {
                return Ok(order.clone());
            }

            if order.status.is_terminal() {
                return Err(WorkflowError::TerminalState {
                    entity: "Order",
                    id: order.id.clone(),
                    state: order.status.to_string(),
                });
            }

            if !lifecycle::is_transition_allowed(order.status, request.to_status) {
                return Err(WorkflowError::InvalidTransition {
                    entity: "Order",
                    id: order.id.clone(),
                    from: order.status.to_string(),
                    to: request.to_status.to_string(),
                });
            }

            let now = chrono::Utc::now().timestamp_millis();
            order.history.push(OrderStatusHistory {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                from_status: Some(order.status),
                to_status: request.to_status,
                changed_by: request.changed_by.clone(),
                reason: request.reason.clone(),
                created_at: now,
            });
            order.status = request.to_status;
            order.updated_at = now;
            Ok(order.clone())
        })?;

        info!(
            order_id = %order.id,
            status = %order.status,
            changed_by = %request.changed_by,
            "Order transition applied"
        );
        Ok(order)
    }

    /// Fetch one order
    pub fn get(&self, order_id: &str) -> WorkflowResult<Order> {
        self.store
            .get(order_id)
            .ok_or_else(|| WorkflowError::not_found("Order", order_id))
    }

    /// Snapshot all orders
    pub fn list(&self) -> Vec<Order> {
        self.store.list()
    }

    /// Fetch an order's transition history
    pub fn history(&self, order_id: &str) -> WorkflowResult<Vec<OrderStatusHistory>> {
        Ok(self.get(order_id)?.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItemCreate, OrderPriority};

    fn item(sku: &str, price: &str, quantity: i32) -> OrderItemCreate {
        OrderItemCreate {
            product_id: format!("prod-{sku}"),
            product_sku: sku.to_string(),
            product_name: format!("Product {sku}"),
            unit_price: price.parse().unwrap(),
            quantity,
        }
    }

    fn create_payload(items: Vec<OrderItemCreate>) -> OrderCreate {
        OrderCreate {
            customer_id: "cust-1".to_string(),
            items,
            priority: OrderPriority::Normal,
            notes: None,
        }
    }

    fn transition_to(status: OrderStatus) -> OrderTransition {
        OrderTransition {
            to_status: status,
            changed_by: "tester".to_string(),
            reason: None,
        }
    }

    #[test]
    fn test_create_computes_line_totals() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![
                item("SKU-1", "10.00", 2),
                item("SKU-2", "5.00", 1),
            ]))
            .unwrap();

        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.items[0].line_total, "20.00".parse().unwrap());
        assert_eq!(order.items[1].line_total, "5.00".parse().unwrap());
        // Initial history entry written by the engine
        assert_eq!(order.history.len(), 1);
        assert_eq!(order.history[0].from_status, None);
        assert_eq!(order.history[0].to_status, OrderStatus::New);
        assert_eq!(order.history[0].changed_by, "system");
    }

    #[test]
    fn test_create_rejects_empty_items() {
        let engine = OrderEngine::new();
        let result = engine.create(create_payload(vec![]));
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_non_positive_quantity() {
        let engine = OrderEngine::new();
        let result = engine.create(create_payload(vec![item("SKU-1", "10.00", 0)]));
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let engine = OrderEngine::new();
        let result = engine.create(create_payload(vec![item("SKU-1", "-1.00", 1)]));
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_transition_appends_history() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![item("SKU-1", "10.00", 1)]))
            .unwrap();

        let order = engine
            .transition(&order.id, transition_to(OrderStatus::Confirmed))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.history.len(), 2);
        assert_eq!(order.history[1].from_status, Some(OrderStatus::New));
        assert_eq!(order.history[1].to_status, OrderStatus::Confirmed);
        assert_eq!(order.history[1].changed_by, "tester");
    }

    #[test]
    fn test_same_status_transition_is_noop() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![item("SKU-1", "10.00", 1)]))
            .unwrap();

        let replayed = engine
            .transition(&order.id, transition_to(OrderStatus::New))
            .unwrap();
        assert_eq!(replayed.status, OrderStatus::New);
        // No duplicate history entry, no updated_at bump
        assert_eq!(replayed.history.len(), 1);
        assert_eq!(replayed.updated_at, order.updated_at);
    }

    #[test]
    fn test_invalid_transition_leaves_status_unchanged() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![item("SKU-1", "10.00", 1)]))
            .unwrap();

        let result = engine.transition(&order.id, transition_to(OrderStatus::Packed));
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));

        let unchanged = engine.get(&order.id).unwrap();
        assert_eq!(unchanged.status, OrderStatus::New);
        assert_eq!(unchanged.history.len(), 1);
    }

    #[test]
    fn test_terminal_order_rejects_further_transitions() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![item("SKU-1", "10.00", 1)]))
            .unwrap();
        engine
            .transition(&order.id, transition_to(OrderStatus::Cancelled))
            .unwrap();

        let result = engine.transition(&order.id, transition_to(OrderStatus::Confirmed));
        assert!(matches!(result, Err(WorkflowError::TerminalState { .. })));

        // Same-status replay still succeeds in a terminal state
        let replayed = engine
            .transition(&order.id, transition_to(OrderStatus::Cancelled))
            .unwrap();
        assert_eq!(replayed.history.len(), 2);
    }

    #[test]
    fn test_transition_unknown_order() {
        let engine = OrderEngine::new();
        let result = engine.transition("missing", transition_to(OrderStatus::Confirmed));
        assert!(matches!(result, Err(WorkflowError::NotFound { .. })));
    }

    #[test]
    fn test_line_total_survives_catalog_price_change() {
        let engine = OrderEngine::new();
        let order = engine
            .create(create_payload(vec![item("SKU-1", "10.00", 2)]))
            .unwrap();

        // A later catalog price change never reaches the stored snapshot
        let fetched = engine.get(&order.id).unwrap();
        assert_eq!(fetched.items[0].unit_price, "10.00".parse().unwrap());
        assert_eq!(fetched.items[0].line_total, "20.00".parse().unwrap());
    }
}
