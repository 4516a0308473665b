//! Error types for Relief

use thiserror::Error;

/// The main error type for Relief operations
#[derive(Debug, Error)]
pub enum ReliefError {
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("{what} index ({row}, {col}) out of range for {rows}x{cols} grid")]
    IndexOutOfRange {
        what: &'static str,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result type alias for Relief operations
pub type Result<T> = std::result::Result<T, ReliefError>;

impl From<toml::de::Error> for ReliefError {
    fn from(err: toml::de::Error) -> Self {
        ReliefError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ReliefError {
    fn from(err: toml::ser::Error) -> Self {
        ReliefError::TomlSerError(err.to_string())
    }
}
