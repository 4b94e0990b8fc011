//! In-memory order store
//!
//! Each aggregate mutation runs inside the map's per-entry exclusive guard,
//! so read-validate-write-append is atomic per order. Two concurrent
//! transitions on the same order serialize; neither ever sees a stale status.
//!
//! A separate unique index enforces order-number uniqueness the way a
//! database constraint would.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::Order;
use shared::{WorkflowError, WorkflowResult};

/// Order aggregate store
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: DashMap<String, Order>,
    /// order_number -> order id (uniqueness constraint)
    number_index: DashMap<String, String>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new order, enforcing order-number uniqueness
    pub fn insert(&self, order: Order) -> WorkflowResult<Order> {
        match self.number_index.entry(order.order_number.clone()) {
            Entry::Occupied(_) => {
                return Err(WorkflowError::conflict(format!(
                    "order number {} already assigned",
                    order.order_number
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(order.id.clone());
            }
        }
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    /// Fetch a snapshot of an order
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.get(order_id).map(|entry| entry.clone())
    }

    /// Snapshot all orders
    pub fn list(&self) -> Vec<Order> {
        self.orders.iter().map(|entry| entry.clone()).collect()
    }

    /// Run a mutation atomically against one order
    ///
    /// The closure executes under the entry's exclusive guard. It must not
    /// touch the store again (that would self-deadlock on the same shard).
    pub fn with_order_mut<T>(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut Order) -> WorkflowResult<T>,
    ) -> WorkflowResult<T> {
        let mut entry = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| WorkflowError::not_found("Order", order_id))?;
        f(entry.value_mut())
    }
}
