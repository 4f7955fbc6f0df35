use std::path::PathBuf;

/// Errors that stop a run before any check starts, or while writing the run report.
///
/// Check failures are never errors: they are reduced into a [`crate::RunResult`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write run report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode run report: {0}")]
    ReportEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
