pub mod history_store;
pub mod notifier;
pub mod report_sink;
pub mod search_provider;
