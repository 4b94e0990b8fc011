//! Order lifecycle end-to-end scenarios

use fulfillment_server::OrderEngine;
use shared::WorkflowError;
use shared::models::{OrderCreate, OrderItemCreate, OrderPriority, OrderStatus, OrderTransition};

fn two_item_payload() -> OrderCreate {
    OrderCreate {
        customer_id: "cust-42".to_string(),
        items: vec![
            OrderItemCreate {
                product_id: "prod-1".to_string(),
                product_sku: "SKU-FRAME".to_string(),
                product_name: "Frame".to_string(),
                unit_price: "10.00".parse().unwrap(),
                quantity: 2,
            },
            OrderItemCreate {
                product_id: "prod-2".to_string(),
                product_sku: "SKU-BOLT".to_string(),
                product_name: "Bolt kit".to_string(),
                unit_price: "5.00".parse().unwrap(),
                quantity: 1,
            },
        ],
        priority: OrderPriority::High,
        notes: Some("rush job".to_string()),
    }
}

fn transition(to_status: OrderStatus) -> OrderTransition {
    OrderTransition {
        to_status,
        changed_by: "ops-user".to_string(),
        reason: None,
    }
}

#[test]
fn order_walks_forward_and_rejects_backtracking() {
    let engine = OrderEngine::new();

    // Create: 2 items (qty 2 @ 10.00, qty 1 @ 5.00)
    let order = engine.create(two_item_payload()).unwrap();
    assert_eq!(order.status, OrderStatus::New);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].line_total, "20.00".parse().unwrap());
    assert_eq!(order.items[1].line_total, "5.00".parse().unwrap());
    assert!(order.order_number.starts_with("OF-"));

    // NEW -> CONFIRMED -> IN_PRODUCTION
    let order = engine
        .transition(&order.id, transition(OrderStatus::Confirmed))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    let order = engine
        .transition(&order.id, transition(OrderStatus::InProduction))
        .unwrap();
    assert_eq!(order.status, OrderStatus::InProduction);

    // IN_PRODUCTION -> NEW is illegal
    let result = engine.transition(&order.id, transition(OrderStatus::New));
    assert!(matches!(
        result,
        Err(WorkflowError::InvalidTransition { .. })
    ));
    assert_eq!(
        engine.get(&order.id).unwrap().status,
        OrderStatus::InProduction
    );
}

#[test]
fn history_reconstructs_the_timeline() {
    let engine = OrderEngine::new();
    let order = engine.create(two_item_payload()).unwrap();

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::InProduction,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::Closed,
    ] {
        engine.transition(&order.id, transition(status)).unwrap();
    }

    let history = engine.history(&order.id).unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[0].from_status, None);
    assert_eq!(history[0].to_status, OrderStatus::New);
    assert_eq!(history[5].to_status, OrderStatus::Closed);
    // Each entry chains from the previous one
    for pair in history.windows(2) {
        assert_eq!(pair[1].from_status, Some(pair[0].to_status));
        assert!(pair[1].created_at >= pair[0].created_at);
    }
}

#[test]
fn cancellation_is_terminal_not_deletion() {
    let engine = OrderEngine::new();
    let order = engine.create(two_item_payload()).unwrap();

    engine
        .transition(
            &order.id,
            OrderTransition {
                to_status: OrderStatus::Cancelled,
                changed_by: "cust-42".to_string(),
                reason: Some("duplicate order".to_string()),
            },
        )
        .unwrap();

    // Still readable, with its full history
    let order = engine.get(&order.id).unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.history.len(), 2);
    assert_eq!(
        order.history[1].reason.as_deref(),
        Some("duplicate order")
    );

    // But closed to further movement
    let result = engine.transition(&order.id, transition(OrderStatus::Confirmed));
    assert!(matches!(result, Err(WorkflowError::TerminalState { .. })));
}
