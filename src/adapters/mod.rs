//! Adapters binding the application ports to concrete backends:
//! ESP-IDF peripherals, NVS storage, the log-based event sink and the
//! cloud link.

pub mod cloud;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
