use crate::domain::entities::history_record::HistoryRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::history_store::{HistoryStore, MAX_LOOKBACK_ROWS};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub const HEADER: [&str; 3] = ["ts", "price_now", "market_now"];

/// One comma-separated file per series at `<dir>/<slug>.csv`.
///
/// Rows are only ever appended. A missing price is written as an empty cell.
/// Single writer assumed; there is no file locking.
pub struct CsvHistoryStore {
    dir: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, slug: &str) -> Result<PathBuf, DomainError> {
        let valid = !slug.is_empty()
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(DomainError::InvalidInput(format!("Invalid series slug: {slug:?}")));
        }
        Ok(self.dir.join(format!("{slug}.csv")))
    }

    fn load(&self, slug: &str) -> Result<Vec<HistoryRecord>, DomainError> {
        let path = self.path_for(slug)?;
        if !path.exists() {
            return Ok(vec![]);
        }
        let text = fs::read_to_string(&path)?;
        Ok(parse_series(&text))
    }
}

impl HistoryStore for CsvHistoryStore {
    fn append(&self, slug: &str, record: &HistoryRecord) -> Result<(), DomainError> {
        let path = self.path_for(slug)?;
        fs::create_dir_all(&self.dir)?;

        if let Some(last) = self.load(slug)?.last() {
            if record.timestamp < last.timestamp {
                return Err(DomainError::InvalidInput(format!(
                    "{slug}: record at {} is older than last stored row at {}",
                    record.timestamp_iso(),
                    last.timestamp_iso()
                )));
            }
        }

        let needs_header = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if needs_header {
            writeln!(file, "{}", HEADER.join(","))?;
        }
        writeln!(
            file,
            "{},{},{}",
            record.timestamp_iso(),
            format_price(record.price),
            format_price(record.market_price)
        )?;
        Ok(())
    }

    fn read_recent(&self, slug: &str, lookback_days: u32) -> Result<Vec<f64>, DomainError> {
        let cutoff = Utc::now() - Duration::days(i64::from(lookback_days));
        let prices: Vec<f64> = self
            .load(slug)?
            .into_iter()
            .filter(|r| r.timestamp >= cutoff)
            .filter_map(|r| r.price)
            .collect();
        let skip = prices.len().saturating_sub(MAX_LOOKBACK_ROWS);
        Ok(prices[skip..].to_vec())
    }

    fn read_all(&self, slug: &str) -> Result<Vec<HistoryRecord>, DomainError> {
        self.load(slug)
    }

    fn list_slugs(&self) -> Result<Vec<String>, DomainError> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut slugs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if self.path_for(stem).is_ok() {
                    slugs.push(stem.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

fn format_price(p: Option<f64>) -> String {
    p.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_price(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Accepts RFC 3339 and the offset-less ISO form older files were written in.
fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let cell = cell.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Rows with an unreadable timestamp are dropped. Column positions come from
/// the header when there is one.
fn parse_series(text: &str) -> Vec<HistoryRecord> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();

    let mut cols = [0usize, 1, 2];
    if let Some(first) = lines.peek() {
        let header: Vec<&str> = first.split(',').map(str::trim).collect();
        if header.first() == Some(&HEADER[0]) {
            for (slot, name) in cols.iter_mut().zip(HEADER) {
                if let Some(pos) = header.iter().position(|h| *h == name) {
                    *slot = pos;
                }
            }
            lines.next();
        }
    }

    lines
        .filter_map(|line| {
            let cells: Vec<&str> = line.split(',').collect();
            let timestamp = parse_timestamp(cells.get(cols[0])?)?;
            Some(HistoryRecord {
                timestamp,
                price: parse_price(cells.get(cols[1]).copied()),
                market_price: parse_price(cells.get(cols[2]).copied()),
            })
        })
        .collect()
}
