use crate::domain::entities::price_entry::PriceEntry;
use crate::domain::error::SearchError;
use async_trait::async_trait;

/// Card search backend.
///
/// `search` receives the free-text base queries of one watch item. For each
/// base query the implementation expands candidates and keeps the results of
/// the first candidate that yields any. Transient failures are retried inside
/// the implementation; whatever is still failing is surfaced as a
/// [`SearchError`] only when no candidate produced results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, base_queries: &[String]) -> Result<Vec<PriceEntry>, SearchError>;
}
