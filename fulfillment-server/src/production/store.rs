//! In-memory production stores
//!
//! Same atomicity model as the order store: one exclusive entry guard per
//! work order. Secondary indexes enforce the 1:1 order/work-order invariant
//! and resolve task ids to their owning work order.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::{Station, StationCreate, WorkOrder};
use shared::{WorkflowError, WorkflowResult};
use uuid::Uuid;

/// Work order aggregate store
#[derive(Debug, Default)]
pub struct WorkOrderStore {
    work_orders: DashMap<String, WorkOrder>,
    /// order_id -> work_order_id (1:1 invariant)
    order_index: DashMap<String, String>,
    /// task_id -> work_order_id
    task_index: DashMap<String, String>,
}

impl WorkOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new work order, enforcing one work order per order
    pub fn insert(&self, work_order: WorkOrder) -> WorkflowResult<WorkOrder> {
        match self.order_index.entry(work_order.order_id.clone()) {
            Entry::Occupied(_) => {
                return Err(WorkflowError::DuplicateWorkOrder {
                    order_id: work_order.order_id.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(work_order.id.clone());
            }
        }
        self.work_orders
            .insert(work_order.id.clone(), work_order.clone());
        Ok(work_order)
    }

    /// Fetch a snapshot of a work order
    pub fn get(&self, work_order_id: &str) -> Option<WorkOrder> {
        self.work_orders.get(work_order_id).map(|entry| entry.clone())
    }

    /// Snapshot all work orders
    pub fn list(&self) -> Vec<WorkOrder> {
        self.work_orders.iter().map(|entry| entry.clone()).collect()
    }

    /// Resolve a task id to its owning work order id
    pub fn work_order_of_task(&self, task_id: &str) -> Option<String> {
        self.task_index.get(task_id).map(|entry| entry.clone())
    }

    /// Register a task under its work order (called after the task is added)
    pub fn register_task(&self, task_id: &str, work_order_id: &str) {
        self.task_index
            .insert(task_id.to_string(), work_order_id.to_string());
    }

    /// Run a mutation atomically against one work order
    ///
    /// The closure executes under the entry's exclusive guard and must not
    /// touch the store again.
    pub fn with_work_order_mut<T>(
        &self,
        work_order_id: &str,
        f: impl FnOnce(&mut WorkOrder) -> WorkflowResult<T>,
    ) -> WorkflowResult<T> {
        let mut entry = self
            .work_orders
            .get_mut(work_order_id)
            .ok_or_else(|| WorkflowError::not_found("WorkOrder", work_order_id))?;
        f(entry.value_mut())
    }
}

/// Station registry
///
/// Static lookup data for the production engine. Stations are created once
/// and consumed read-only; `code` is unique.
#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: DashMap<String, Station>,
    /// code -> station id (uniqueness constraint)
    code_index: DashMap<String, String>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station, enforcing code uniqueness
    pub fn insert(&self, payload: StationCreate) -> WorkflowResult<Station> {
        let station = Station {
            id: Uuid::new_v4().to_string(),
            code: payload.code,
            station_type: payload.station_type,
            active: payload.active,
        };
        match self.code_index.entry(station.code.clone()) {
            Entry::Occupied(_) => {
                return Err(WorkflowError::conflict(format!(
                    "station code {} already registered",
                    station.code
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(station.id.clone());
            }
        }
        self.stations.insert(station.id.clone(), station.clone());
        Ok(station)
    }

    /// Fetch one station
    pub fn get(&self, station_id: &str) -> Option<Station> {
        self.stations.get(station_id).map(|entry| entry.clone())
    }

    /// Snapshot all stations
    pub fn list(&self) -> Vec<Station> {
        self.stations.iter().map(|entry| entry.clone()).collect()
    }
}
