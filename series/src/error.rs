use std::io;

/// Why a single row was left out of an extraction.
///
/// These never abort an extraction: the row is skipped and counted.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum InvalidRowError {
    #[error("the timestamp column `{0}` is missing")]
    MissingTimestamp(String),

    #[error("the timestamp column `{column}` holds the non-numeric value {value:?}")]
    NonNumericTimestamp { column: String, value: String },

    #[error("{0} is not a finite serial date")]
    NonFinite(f64),

    #[error("the serial date {0} is outside of the supported calendar range")]
    OutOfRange(f64),
}

/// A table provider could not produce its rows.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
