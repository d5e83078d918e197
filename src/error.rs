//! Error types.

use thiserror::Error;

/// Dataset loading error types.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column not found: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid date {value:?}")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid number {value:?} in column {column:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Chart rendering error types.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("dataset is empty, nothing to render")]
    EmptyDataset,
}
