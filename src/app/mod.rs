//! Application layer: the desk service, its commands and events, and
//! the port traits that decouple it from hardware.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

pub use commands::DeskCommand;
pub use events::AppEvent;
pub use service::DeskService;
