//! Application module
//!
//! This module contains the configuration and UI-side state.

pub mod config;
mod state;

pub use config::{AppConfig, CAPTURE_INTERVAL, RETENTION_PERIOD};
pub use state::{AppState, LogEntry};
