//! Order Model
//!
//! The customer-facing aggregate: an order, its line items (point-in-time
//! product snapshots) and its append-only status history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Forward chain: NEW -> CONFIRMED -> IN_PRODUCTION -> PACKED -> SHIPPED -> CLOSED.
/// REJECTED and CANCELLED are terminal side branches reachable from any
/// non-terminal status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Confirmed,
    InProduction,
    Packed,
    Shipped,
    Closed,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses accept no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Rejected | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "NEW",
            Self::Confirmed => "CONFIRMED",
            Self::InProduction => "IN_PRODUCTION",
            Self::Packed => "PACKED",
            Self::Shipped => "SHIPPED",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Order priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Order line item
///
/// product_sku / product_name / unit_price are denormalized snapshots taken
/// from the catalog at creation time and never re-read afterwards.
/// line_total is computed once at creation; a later catalog price change
/// must not affect it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Catalog reference (weak, not validated for existence)
    pub product_id: String,
    pub product_sku: String,
    pub product_name: String,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: i32,
    /// unit_price * quantity, frozen at creation
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

/// Append-only status transition record
///
/// from_status is None only for the initial NEW entry. Entries are never
/// mutated or deleted; ordering by created_at reconstructs the timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatusHistory {
    pub id: String,
    pub order_id: String,
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    /// Actor identifier: user id, or "system" (optionally suffixed with a
    /// gateway correlation id) for coordinator-driven transitions
    pub changed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Unix milliseconds
    pub created_at: i64,
}

/// Order aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Unique, human-readable, immutable once assigned
    pub order_number: String,
    /// Customer reference (weak, not validated for existence)
    pub customer_id: String,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Line items in insertion order
    pub items: Vec<OrderItem>,
    /// Append-only transition history
    pub history: Vec<OrderStatusHistory>,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

/// Create order line item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: String,
    pub product_sku: String,
    pub product_name: String,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: String,
    pub items: Vec<OrderItemCreate>,
    #[serde(default)]
    pub priority: OrderPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request a status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTransition {
    pub to_status: OrderStatus,
    pub changed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
