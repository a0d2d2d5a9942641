//! Logging utilities.
//!
//! Everything in this workspace logs through the `log` facade. This module
//! only installs `env_logger` as the backend for binaries and tests.

mod init;

pub use init::{init_logging, LoggingConfig};
