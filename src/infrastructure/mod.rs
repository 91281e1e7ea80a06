pub mod feeds;
pub mod history;
pub mod notify;
pub mod report;
