use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into observations.
///
/// Any of these is fatal for the session: no partial dataset is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
