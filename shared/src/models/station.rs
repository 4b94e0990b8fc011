//! Station Model

use serde::{Deserialize, Serialize};

/// Station type, doubles as the work order stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationType {
    #[default]
    Production,
    Packing,
    Shipping,
}

/// Production station entity
///
/// Static lookup data consumed, never mutated, by the production engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    /// Unique station code
    pub code: String,
    pub station_type: StationType,
    pub active: bool,
}

/// Create station payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationCreate {
    pub code: String,
    pub station_type: StationType,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
