use serde::{Deserialize, Serialize};

/// Point-in-time price snapshot. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub current_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub day_open: f64,
    pub previous_close: f64,
    /// Epoch seconds.
    pub timestamp: i64,
}
