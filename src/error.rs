use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the access log or writing reports
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not valid UTF-8 text", path.display())]
    Encoding { path: PathBuf },

    #[error("could not write CSV report to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
