use crate::domain::error::{FailureKind, ItemFailure};
use crate::domain::values::signal::SignalResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What one successfully processed watch item produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub name: String,
    pub entries: usize,
    pub price_now: Option<f64>,
    pub signal: SignalResult,
    pub trend_ok: bool,
    pub alerted: bool,
    pub note: String,
}

/// Per-item row of the run report, for successes and failures alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub name: String,
    pub entries: usize,
    pub price_now: Option<f64>,
    pub pct_24h: f64,
    pub pct_7d: f64,
    pub breakout: bool,
    pub alerted: bool,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl ReportItem {
    pub fn from_outcome(name: &str, outcome: &Result<ItemSummary, ItemFailure>) -> Self {
        match outcome {
            Ok(s) => Self {
                name: s.name.clone(),
                entries: s.entries,
                price_now: s.price_now,
                pct_24h: s.signal.pct_24h,
                pct_7d: s.signal.pct_7d,
                breakout: s.signal.breakout,
                alerted: s.alerted,
                note: s.note.clone(),
                failure: None,
            },
            Err(f) => Self {
                name: name.to_string(),
                entries: 0,
                price_now: None,
                pct_24h: 0.0,
                pct_7d: 0.0,
                breakout: false,
                alerted: false,
                note: format!("ERROR {}: {}", f.kind, truncate(&f.message, 300)),
                failure: Some(f.kind),
            },
        }
    }
}

/// Aggregate of one full cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub started: DateTime<Utc>,
    pub duration_sec: f64,
    pub cards_total: usize,
    pub batch_size: usize,
    pub processed: usize,
    pub skipped: usize,
    pub timeouts: usize,
    pub net_errors: usize,
    pub parse_errors: usize,
    pub other_errors: usize,
    pub alerts_sent: usize,
    pub items: Vec<ReportItem>,
}

impl RunReport {
    pub fn new(started: DateTime<Utc>, cards_total: usize, batch_size: usize) -> Self {
        Self {
            started,
            duration_sec: 0.0,
            cards_total,
            batch_size,
            processed: 0,
            skipped: 0,
            timeouts: 0,
            net_errors: 0,
            parse_errors: 0,
            other_errors: 0,
            alerts_sent: 0,
            items: Vec::new(),
        }
    }

    /// Fold one attempted item into the counters and the item list.
    pub fn record(&mut self, name: &str, outcome: &Result<ItemSummary, ItemFailure>) {
        self.processed += 1;
        match outcome {
            Ok(s) if s.alerted => self.alerts_sent += 1,
            Ok(_) => {}
            Err(f) => match f.kind {
                FailureKind::Timeout => self.timeouts += 1,
                FailureKind::Network => self.net_errors += 1,
                FailureKind::Parse => self.parse_errors += 1,
                FailureKind::Other => self.other_errors += 1,
            },
        }
        self.items.push(ReportItem::from_outcome(name, outcome));
    }

    pub fn failures(&self) -> usize {
        self.timeouts + self.net_errors + self.parse_errors + self.other_errors
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
