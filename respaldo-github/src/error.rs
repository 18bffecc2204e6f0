//! Error types for respaldo-github.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from version-control invocations. Each one aborts the current
/// project only.
#[derive(Debug, Error)]
pub enum GitError {
    /// The program could not be started at all (not installed, not executable).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}
