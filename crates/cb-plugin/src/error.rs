//! Plugin error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::lister::ListFailure;

/// Errors raised while dispatching to or listing plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// argv starts with a flag, so there is no word to name a plugin.
    #[error("flags cannot be placed before plugin name: {0}")]
    FlagsBeforeName(String),

    /// The resolved executable could not be launched.
    #[error("failed to execute plugin {}: {source}", .path.display())]
    Execution {
        /// Executable that failed to start.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A spawned plugin ran but did not exit successfully.
    #[error("plugin {} exited with {status}", .path.display())]
    ChildFailed {
        /// Executable that was run.
        path: PathBuf,
        /// Exit status reported by the child.
        status: ExitStatus,
    },

    /// `plugin list` found nothing or found problems.
    #[error("{0}")]
    ListFailed(ListFailure),

    /// IO error while writing the listing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
