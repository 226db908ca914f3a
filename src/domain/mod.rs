pub mod environment;
pub mod network;
pub mod ports;
pub mod process_status;
pub mod remote_output;
pub mod reports;
pub mod runtime_metrics;
