//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use cardwatch::application::run_cycle::CycleSettings;
use cardwatch::config::AppConfig;
use cardwatch::domain::entities::history_record::HistoryRecord;
use cardwatch::domain::entities::price_entry::{PriceEntry, PriceWindow};
use cardwatch::domain::entities::run_report::RunReport;
use cardwatch::domain::error::{DomainError, SearchError};
use cardwatch::domain::ports::history_store::HistoryStore;
use cardwatch::domain::ports::notifier::Notifier;
use cardwatch::domain::ports::report_sink::{PanelRow, ReportSink};
use cardwatch::domain::ports::search_provider::SearchProvider;
use cardwatch::domain::values::signal::SpikeThresholds;
use cardwatch::domain::values::trend::TrendGate;
use cardwatch::infrastructure::history::csv_store::CsvHistoryStore;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// What the scripted provider answers for one watch item.
#[derive(Debug, Clone)]
pub enum Scripted {
    Found(Vec<PriceEntry>),
    Timeout,
    Network,
    Parse,
}

/// Search provider answering from a script keyed by the item's first query.
/// Unknown queries return no results.
#[derive(Default)]
pub struct ScriptedSearch {
    script: HashMap<String, Scripted>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, answer: Scripted) -> Self {
        self.script.insert(query.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, base_queries: &[String]) -> Result<Vec<PriceEntry>, SearchError> {
        let key = base_queries.first().cloned().unwrap_or_default();
        self.calls.lock().unwrap().push(key.clone());
        match self.script.get(&key) {
            Some(Scripted::Found(entries)) => Ok(entries.clone()),
            Some(Scripted::Timeout) => Err(SearchError::Timeout(key)),
            Some(Scripted::Network) => Err(SearchError::Network(format!("connection reset for {key}"))),
            Some(Scripted::Parse) => Err(SearchError::Parse("expected value at line 1".into())),
            None => Ok(vec![]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(String),
    Photo { url: String, caption: String },
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, body: &str) {
        self.sent.lock().unwrap().push(Sent::Text(body.to_string()));
    }

    async fn send_photo(&self, image_url: &str, caption: &str) {
        self.sent.lock().unwrap().push(Sent::Photo {
            url: image_url.to_string(),
            caption: caption.to_string(),
        });
    }
}

#[derive(Default)]
pub struct MemoryReportSink {
    pub reports: Mutex<Vec<RunReport>>,
    pub panels: Mutex<Vec<Vec<PanelRow>>>,
}

impl ReportSink for MemoryReportSink {
    fn write_run_report(&self, report: &RunReport) -> Result<(), DomainError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    fn write_panel(&self, rows: &[PanelRow]) -> Result<(), DomainError> {
        self.panels.lock().unwrap().push(rows.to_vec());
        Ok(())
    }
}

pub fn entry(price: Option<f64>) -> PriceEntry {
    PriceEntry {
        name: Some("Test Card".into()),
        set_name: Some("Evolving Skies".into()),
        price,
        ..Default::default()
    }
}

pub fn entry_with_window(price: Option<f64>, avg1: f64, avg7: f64, avg30: f64) -> PriceEntry {
    PriceEntry {
        secondary: Some(PriceWindow {
            avg1: Some(avg1),
            avg7: Some(avg7),
            avg30: Some(avg30),
        }),
        ..entry(price)
    }
}

pub fn settings(pct_24h: f64, pct_7d: f64) -> CycleSettings {
    CycleSettings {
        thresholds: SpikeThresholds { pct_24h, pct_7d },
        breakout_days: 7,
        trend: TrendGate::new(false, None),
        batch_size: None,
        max_runtime: None,
        force_test_alert: false,
        send_ping: false,
    }
}

/// Seed a series with prices spaced one hour apart, the last one an hour ago.
pub fn seed_history(store: &CsvHistoryStore, slug: &str, prices: &[f64]) {
    let n = prices.len() as i64;
    let start: DateTime<Utc> = Utc::now() - Duration::hours(n);
    for (i, p) in prices.iter().enumerate() {
        let ts = start + Duration::hours(i as i64);
        store
            .append(slug, &HistoryRecord::new(ts, Some(*p), None))
            .unwrap();
    }
}

pub fn config_for(dir: &Path, watchlist_toml: &str) -> AppConfig {
    let text = format!(
        r#"
[thresholds]
pct_24h = 0.15
pct_7d = 0.15

[run]
use_cardmarket_trend = false

[paths]
data_dir = "{}"
docs_dir = "{}"

{watchlist_toml}
"#,
        dir.join("data").display(),
        dir.join("docs").display(),
    );
    AppConfig::from_toml_str(&text, &HashMap::new()).unwrap()
}
