pub mod alert_message;
pub mod batch;
pub mod panel;
pub mod run_cycle;
