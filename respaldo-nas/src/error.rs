//! Error types for respaldo-nas.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while mirroring a project to the NAS.
///
/// Any of these aborts the rest of the current project.
#[derive(Debug, Error)]
pub enum NasError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed (permission denied, loop, vanished entry).
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The project path has no final component to name the target directory.
    #[error("cannot derive a target name from project path {path}")]
    InvalidProjectDir { path: PathBuf },
}

/// Convenience constructor for [`NasError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> NasError {
    NasError::Io {
        path: path.into(),
        source,
    }
}
