//! Logging setup
//!
//! Library code emits `tracing` events; hosts call [`init`] once to send
//! them to a file.

pub mod file_logger;

pub use file_logger::{init, installed_level, log_file_path, clear_log, LogLevel, LOG_ENV_VAR};
