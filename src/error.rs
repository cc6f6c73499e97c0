use std::path::PathBuf;

use thiserror::Error;

/// Library error type for discovery and thumbnail operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured directory is missing or not a directory.
    #[error("invalid directory: {}", .0.display())]
    BadDir(PathBuf),

    /// The thumbnail output directory could not be created.
    #[error("failed to create thumbnail directory {}: {source}", path.display())]
    ThumbDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external thumbnail tool could not be started.
    #[error("failed to launch thumbnail tool {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external thumbnail tool ran but reported failure.
    #[error("thumbnail tool exited with {status} for {}", video.display())]
    ToolFailed {
        video: PathBuf,
        status: std::process::ExitStatus,
    },

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
