//! Error types for platform backend operations

use thiserror::Error;

/// Errors that can occur while talking to the platform
#[derive(Error, Debug)]
pub enum Error {
    /// No service manager available on this host
    #[error("service manager not available: {0}")]
    ServiceManagerUnavailable(String),

    /// A backend command ran but reported failure
    #[error("command failed: {message}")]
    CommandFailed { message: String, stderr: String },

    /// A start action had no command line and no known executable
    #[error("no command line captured for process '{0}'")]
    NoCommandLine(String),

    /// No live process matched the target
    #[error("process '{0}' is not running")]
    ProcessNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hostkit operations
pub type Result<T> = std::result::Result<T, Error>;
