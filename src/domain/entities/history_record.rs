use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One persisted price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub price: Option<f64>,
    pub market_price: Option<f64>,
}

impl HistoryRecord {
    pub fn new(timestamp: DateTime<Utc>, price: Option<f64>, market_price: Option<f64>) -> Self {
        Self {
            timestamp,
            price,
            market_price,
        }
    }

    /// Fixed-width ISO-8601 form, so stored timestamps sort lexically.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}
