use std::path::PathBuf;

use thiserror::Error;

use crate::field::Metric;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read dataset `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported dataset format `{0}`; expected .json or .csv")]
    UnsupportedFormat(String),
}

/// A metric cell that could not be read as a number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed {metric:?} value `{raw}` in {year} record for {university}")]
pub struct MalformedMetricValue {
    pub metric: Metric,
    pub year: i32,
    pub university: String,
    pub raw: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("end year {end} is before start year {start}")]
pub struct InvalidYearRange {
    pub start: i32,
    pub end: i32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown survey field `{0}`")]
pub struct ParseFieldError(pub String);

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    Level(String),
    #[error("failed to create log directory `{path}`: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
}
