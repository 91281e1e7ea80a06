use super::html::{render_health_page, render_panel_page};
use crate::domain::entities::run_report::RunReport;
use crate::domain::error::DomainError;
use crate::domain::ports::report_sink::{PanelRow, ReportSink};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Writes `status.json` next to the price series and the HTML pages plus
/// `data.csv` into the docs directory.
pub struct FileReportSink {
    data_dir: PathBuf,
    docs_dir: PathBuf,
}

impl FileReportSink {
    pub fn new(data_dir: impl Into<PathBuf>, docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            docs_dir: docs_dir.into(),
        }
    }
}

impl ReportSink for FileReportSink {
    fn write_run_report(&self, report: &RunReport) -> Result<(), DomainError> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.docs_dir)?;

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| DomainError::Parse(format!("Failed to serialize run report: {e}")))?;
        let status_path = self.data_dir.join("status.json");
        fs::write(&status_path, json)?;

        let health_path = self.docs_dir.join("health.html");
        fs::write(&health_path, render_health_page(report))?;

        info!(
            status = %status_path.display(),
            health = %health_path.display(),
            "run report written"
        );
        Ok(())
    }

    fn write_panel(&self, rows: &[PanelRow]) -> Result<(), DomainError> {
        fs::create_dir_all(&self.docs_dir)?;
        fs::write(self.docs_dir.join("data.csv"), panel_csv(rows))?;
        fs::write(self.docs_dir.join("index.html"), render_panel_page(rows))?;
        info!(rows = rows.len(), dir = %self.docs_dir.display(), "price panel written");
        Ok(())
    }
}

fn csv_cell(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn panel_csv(rows: &[PanelRow]) -> String {
    let mut out = String::from("name,price_now,market_now,pct_24h,pct_7d,breakout\n");
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_cell(&r.name),
            r.price_now,
            r.market_now.map(|v| v.to_string()).unwrap_or_default(),
            r.pct_24h,
            r.pct_7d,
            r.breakout
        ));
    }
    out
}
