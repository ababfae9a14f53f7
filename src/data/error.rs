//! Error taxonomy for loading a housing source.
//!
//! Loading is the only fallible step. Filtering and binning are total over a
//! loaded [`Dataset`](super::model::Dataset).

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a dataset. Always fatal for that load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed parquet in {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to decode record batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("{path} is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("{0} contains no data rows")]
    Empty(PathBuf),
}
