// Report error types
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that abort a report run
#[derive(Error, Debug)]
pub enum ReportError {
    /// Could not open or close a connection to the event store
    #[error("event store connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A dataset query failed
    #[error("query for {dataset} failed: {source}")]
    Store {
        dataset: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The PDF backend rejected a page
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// The output document could not be written
    #[error("failed to write report to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Assembly was asked to write a document without pages
    #[error("report has no figures to write")]
    NoFigures,
}

impl ReportError {
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}
