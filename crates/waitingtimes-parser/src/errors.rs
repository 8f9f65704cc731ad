use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unexpected columns: {actual:?} (expected {expected:?})")]
    SchemaMismatch {
        actual: Vec<String>,
        expected: Vec<String>,
    },

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} has no header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column {column} line {line}: cannot parse '{value}' as a datetime: {reason}")]
    DateTime {
        column: &'static str,
        line: usize,
        value: String,
        reason: String,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
