//! Error types for the inventory_forecast crate
//!
//! The pipeline itself never fails on data: empty or malformed input turns
//! into empty results. These errors cover configuration, I/O and the strict
//! row policy of the record parser.

use thiserror::Error;

/// Custom error types for the inventory_forecast crate
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A CSV row did not satisfy the column schema
    #[error("Row {line}: invalid value for column {column}: {reason}")]
    InvalidRow {
        line: usize,
        column: String,
        reason: String,
    },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] stock_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from reading a TOML configuration file
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, InventoryError>;
