use crate::domain::entities::run_report::RunReport;
use crate::domain::error::DomainError;
use serde::Serialize;

/// One row of the price panel, summarising a stored series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRow {
    pub name: String,
    pub price_now: f64,
    pub market_now: Option<f64>,
    pub pct_24h: f64,
    pub pct_7d: f64,
    pub breakout: bool,
}

/// Destination for rendered run reports and the price panel.
pub trait ReportSink: Send + Sync {
    fn write_run_report(&self, report: &RunReport) -> Result<(), DomainError>;

    fn write_panel(&self, rows: &[PanelRow]) -> Result<(), DomainError>;
}
