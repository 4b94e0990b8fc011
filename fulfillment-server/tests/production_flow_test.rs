//! Production workflow + coordinator choreography scenarios

use std::sync::Arc;
use std::time::Duration;

use fulfillment_server::coordinator::EngineOrderTransitions;
use fulfillment_server::core::{BackgroundTasks, TaskKind};
use fulfillment_server::{OrderEngine, ProductionEngine, WorkflowCoordinator};
use shared::WorkflowError;
use shared::models::{
    OrderCreate, OrderItemCreate, OrderPriority, OrderStatus, OrderTransition, RejectionCreate,
    TaskType, WorkOrderCreate, WorkOrderState, WorkTaskCreate,
};

fn order_in_production(orders: &OrderEngine) -> shared::models::Order {
    let order = orders
        .create(OrderCreate {
            customer_id: "cust-7".to_string(),
            items: vec![OrderItemCreate {
                product_id: "prod-1".to_string(),
                product_sku: "SKU-CHAIR".to_string(),
                product_name: "Chair".to_string(),
                unit_price: "79.90".parse().unwrap(),
                quantity: 4,
            }],
            priority: OrderPriority::Normal,
            notes: None,
        })
        .unwrap();
    for status in [OrderStatus::Confirmed, OrderStatus::InProduction] {
        orders
            .transition(
                &order.id,
                OrderTransition {
                    to_status: status,
                    changed_by: "ops-user".to_string(),
                    reason: None,
                },
            )
            .unwrap();
    }
    orders.get(&order.id).unwrap()
}

fn add_build_task(production: &ProductionEngine, work_order_id: &str) -> shared::models::WorkTask {
    production
        .add_task(
            work_order_id,
            WorkTaskCreate {
                task_type: TaskType::Build,
                station_id: None,
                assigned_to: None,
            },
        )
        .unwrap()
}

#[tokio::test]
async fn completed_work_order_packs_the_order() {
    let orders = Arc::new(OrderEngine::new());
    let production = ProductionEngine::new();
    let coordinator =
        WorkflowCoordinator::new(Arc::new(EngineOrderTransitions::new(orders.clone())), 2, 1);

    let order = order_in_production(&orders);
    let work_order = production
        .create_work_order(WorkOrderCreate {
            order_id: order.id.clone(),
        })
        .unwrap();

    let task1 = add_build_task(&production, &work_order.id);
    let task2 = add_build_task(&production, &work_order.id);

    let mut outcomes = production.subscribe_outcomes();

    // First completion: OPEN -> IN_PROGRESS
    production.complete_task(&task1.id).unwrap();
    assert_eq!(
        production.get_work_order(&work_order.id).unwrap().state,
        WorkOrderState::InProgress
    );

    // Second completion: IN_PROGRESS -> DONE, outcome published
    production.complete_task(&task2.id).unwrap();
    assert_eq!(
        production.get_work_order(&work_order.id).unwrap().state,
        WorkOrderState::Done
    );

    let outcome = outcomes.recv().await.unwrap();
    let order = coordinator.on_outcome(&outcome, "system").await.unwrap();
    assert_eq!(order.status, OrderStatus::Packed);

    let last = order.history.last().unwrap();
    assert_eq!(last.changed_by, "system");
    assert!(last.reason.as_deref().unwrap().contains(&work_order.id));
}

#[tokio::test]
async fn rejection_rejects_work_order_and_order() {
    let orders = Arc::new(OrderEngine::new());
    let production = ProductionEngine::new();
    let coordinator =
        WorkflowCoordinator::new(Arc::new(EngineOrderTransitions::new(orders.clone())), 2, 1);

    let order = order_in_production(&orders);
    let work_order = production
        .create_work_order(WorkOrderCreate {
            order_id: order.id.clone(),
        })
        .unwrap();
    let task1 = add_build_task(&production, &work_order.id);
    let task2 = add_build_task(&production, &work_order.id);
    production.complete_task(&task1.id).unwrap();

    let mut outcomes = production.subscribe_outcomes();
    production
        .record_rejection(
            &work_order.id,
            RejectionCreate {
                category: "QC_FAIL".to_string(),
                details: "paint blistering".to_string(),
            },
        )
        .unwrap();

    // Work order terminal even with a task still TODO
    let work_order = production.get_work_order(&work_order.id).unwrap();
    assert_eq!(work_order.state, WorkOrderState::Rejected);

    let result = production.complete_task(&task2.id);
    assert!(matches!(result, Err(WorkflowError::TerminalState { .. })));

    // Coordinator carries the rejection into the order history
    let outcome = outcomes.recv().await.unwrap();
    let order = coordinator.on_outcome(&outcome, "system").await.unwrap();
    assert_eq!(order.status, OrderStatus::Rejected);
    let reason = order.history.last().unwrap().reason.clone().unwrap();
    assert!(reason.contains("QC_FAIL"));
    assert!(reason.contains("paint blistering"));
}

#[tokio::test]
async fn listener_reconciles_without_manual_delivery() {
    let orders = Arc::new(OrderEngine::new());
    let production = Arc::new(ProductionEngine::new());
    let coordinator = Arc::new(WorkflowCoordinator::new(
        Arc::new(EngineOrderTransitions::new(orders.clone())),
        2,
        1,
    ));

    let mut tasks = BackgroundTasks::new();
    let rx = production.subscribe_outcomes();
    let listener = coordinator.clone();
    tasks.spawn("coordinator-listener", TaskKind::Listener, |token| async move {
        listener.run_listener(rx, token).await;
    });

    let order = order_in_production(&orders);
    let work_order = production
        .create_work_order(WorkOrderCreate {
            order_id: order.id.clone(),
        })
        .unwrap();
    let task = add_build_task(&production, &work_order.id);
    production.complete_task(&task.id).unwrap();

    // Propagation is asynchronous: poll until the order catches up
    let mut packed = false;
    for _ in 0..100 {
        if orders.get(&order.id).unwrap().status == OrderStatus::Packed {
            packed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(packed, "order never reached PACKED via the listener");

    tasks.shutdown().await;
}

#[tokio::test]
async fn conflicting_outcome_is_dead_lettered() {
    let orders = Arc::new(OrderEngine::new());
    let production = ProductionEngine::new();
    let coordinator =
        WorkflowCoordinator::new(Arc::new(EngineOrderTransitions::new(orders.clone())), 2, 1);

    let order = order_in_production(&orders);
    let work_order = production
        .create_work_order(WorkOrderCreate {
            order_id: order.id.clone(),
        })
        .unwrap();
    let task = add_build_task(&production, &work_order.id);

    // The customer cancels while production finishes: the two terminal
    // states legitimately disagree
    orders
        .transition(
            &order.id,
            OrderTransition {
                to_status: OrderStatus::Cancelled,
                changed_by: "cust-7".to_string(),
                reason: None,
            },
        )
        .unwrap();

    let mut outcomes = production.subscribe_outcomes();
    production.complete_task(&task.id).unwrap();
    let outcome = outcomes.recv().await.unwrap();

    let result = coordinator.on_outcome(&outcome, "system").await;
    assert!(matches!(result, Err(WorkflowError::Conflict { .. })));

    let parked = coordinator.dead_letters();
    assert_eq!(parked.len(), 1);
    assert!(parked[0].error.contains(&order.id));
}
