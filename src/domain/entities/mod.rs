pub mod history_record;
pub mod price_entry;
pub mod run_report;
pub mod watch_item;
