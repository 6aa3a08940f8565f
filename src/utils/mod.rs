//! Utility modules for error handling, configuration, formatting and language tags

pub mod config;
pub mod error;
pub mod format;
pub mod locale;

// Re-export for convenience
pub use config::{Preferences, BEST_RESOLUTION};
pub use error::StreamError;
pub use format::{format_bytes, UNKNOWN_SIZE};
