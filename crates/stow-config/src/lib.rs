//! Configuration management for stow
//!
//! Provides the configuration types, their layered loading logic and the
//! process-wide logging initialization.

pub mod config;
pub mod logging;

// Re-export commonly used types at the crate root for convenience
pub use config::{AppConfig, LogFormat, LoggingConfig, PlacementConfig};
