use crate::domain::entities::history_record::HistoryRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::history_store::HistoryStore;
use crate::domain::ports::report_sink::{PanelRow, ReportSink};
use crate::domain::values::signal::pct_delta;
use std::sync::Arc;
use tracing::debug;

pub struct PanelUseCase {
    history: Arc<dyn HistoryStore>,
    sink: Arc<dyn ReportSink>,
}

impl PanelUseCase {
    pub fn new(history: Arc<dyn HistoryStore>, sink: Arc<dyn ReportSink>) -> Self {
        Self { history, sink }
    }

    /// One row per stored series that has at least one priced observation.
    pub fn rows(&self) -> Result<Vec<PanelRow>, DomainError> {
        let mut rows = Vec::new();
        for slug in self.history.list_slugs()? {
            let records = self.history.read_all(&slug)?;
            match summarize_series(&slug, &records) {
                Some(row) => rows.push(row),
                None => debug!(slug = %slug, "series has no priced rows, left off the panel"),
            }
        }
        Ok(rows)
    }

    pub fn execute(&self) -> Result<Vec<PanelRow>, DomainError> {
        let rows = self.rows()?;
        self.sink.write_panel(&rows)?;
        Ok(rows)
    }
}

/// Summarise a series: latest price against the previous row (24h) and the
/// first row (7d); breakout when the latest beats every earlier price.
pub fn summarize_series(slug: &str, records: &[HistoryRecord]) -> Option<PanelRow> {
    let priced: Vec<(&HistoryRecord, f64)> = records
        .iter()
        .filter_map(|r| r.price.map(|p| (r, p)))
        .collect();
    let (&(last, now), earlier) = priced.split_last()?;

    let prev = earlier.last().map_or(now, |(_, p)| *p);
    let first = priced[0].1;
    let breakout = earlier
        .iter()
        .map(|(_, p)| *p)
        .reduce(f64::max)
        .is_some_and(|max| now > max);

    Some(PanelRow {
        name: title_case(slug),
        price_now: now,
        market_now: last.market_price,
        pct_24h: pct_delta(now, prev),
        pct_7d: pct_delta(now, first),
        breakout,
    })
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
