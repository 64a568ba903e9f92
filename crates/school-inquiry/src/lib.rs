pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
mod http;
pub mod inquiries;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod transport;
