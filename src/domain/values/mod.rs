pub mod candidate_query;
pub mod price_stats;
pub mod signal;
pub mod trend;
