pub mod cache;
pub mod report_manager;
pub mod services;
