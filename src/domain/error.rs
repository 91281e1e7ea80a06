use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// Failure surfaced by a search provider after its own retries are exhausted.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP {code} for query {query}")]
    Status { code: u16, query: String },
}

/// Coarse classification used by the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Timeout,
    Network,
    Parse,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network"),
            FailureKind::Parse => write!(f, "parse"),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// A watch item that could not be processed, with the reason it failed.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct ItemFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ItemFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<SearchError> for ItemFailure {
    fn from(e: SearchError) -> Self {
        let kind = match &e {
            SearchError::Timeout(_) => FailureKind::Timeout,
            SearchError::Network(_) | SearchError::Status { .. } => FailureKind::Network,
            SearchError::Parse(_) => FailureKind::Parse,
        };
        ItemFailure::new(kind, e.to_string())
    }
}

impl From<DomainError> for ItemFailure {
    fn from(e: DomainError) -> Self {
        let kind = match &e {
            DomainError::Parse(_) => FailureKind::Parse,
            _ => FailureKind::Other,
        };
        ItemFailure::new(kind, e.to_string())
    }
}
