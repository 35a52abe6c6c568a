use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a route from its source
///
/// Raised once per load attempt. Nothing retries automatically; the caller
/// decides whether to invoke the loader again.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid route JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid route CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("point {index}: invalid {field} {value:?}")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("point {index}: unrecognised timestamp {value:?}")]
    InvalidTimestamp { index: usize, value: String },

    #[error("unknown route format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

impl DataLoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
