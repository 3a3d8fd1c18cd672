//! Error taxonomy for the screening pipeline.
//!
//! Dataset problems are fatal to the whole run; scoring problems are fatal to
//! the scoring call only (the caller can retry with a valid profile). Row-level
//! data issues never surface here: the loader drops the row with a warning and
//! carries on.

use std::path::PathBuf;
use thiserror::Error;

/// The source spreadsheet could not be turned into a fund table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
}

/// A weight profile that cannot be scored with.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("unknown scoring metric '{0}'")]
    UnknownMetric(String),

    #[error("metric '{metric}' has negative weight {weight}")]
    NegativeWeight { metric: String, weight: f64 },

    #[error("weight profile has no metric with a positive weight")]
    NoActiveMetrics,
}
