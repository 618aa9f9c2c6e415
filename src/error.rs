//! # Error Types
//!
//! Custom error types for the analog stick subsystem using `thiserror`.
//!
//! Only setup and persistence paths return these errors. The per-cycle
//! pipeline is total and resolves bad input by clamping or fallback.

use thiserror::Error;

/// Main error type for the analog stick subsystem
#[derive(Debug, Error)]
pub enum AnalogError {
    /// ADC device errors
    #[error("ADC error: {0}")]
    Adc(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Options serialization errors
    #[error("Options serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the analog stick subsystem
pub type Result<T> = std::result::Result<T, AnalogError>;
