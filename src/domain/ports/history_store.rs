use crate::domain::entities::history_record::HistoryRecord;
use crate::domain::error::DomainError;

/// Upper bound on rows returned by a lookback read.
pub const MAX_LOOKBACK_ROWS: usize = 1000;

/// Append-only price series, one per watched card, keyed by slug.
pub trait HistoryStore: Send + Sync {
    /// Append one observation. Rejects records older than the last stored one.
    fn append(&self, slug: &str, record: &HistoryRecord) -> Result<(), DomainError>;

    /// Prices recorded within the last `lookback_days`, oldest first, capped at
    /// [`MAX_LOOKBACK_ROWS`] most recent. Rows without a usable price are skipped.
    fn read_recent(&self, slug: &str, lookback_days: u32) -> Result<Vec<f64>, DomainError>;

    /// Every parseable row of a series, oldest first.
    fn read_all(&self, slug: &str) -> Result<Vec<HistoryRecord>, DomainError>;

    /// Slugs of all stored series, sorted.
    fn list_slugs(&self) -> Result<Vec<String>, DomainError>;
}
