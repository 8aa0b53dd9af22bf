//! Error types for the deltakit crate

use thiserror::Error;

/// Errors that can occur during capture, planning, or execution setup
#[derive(Error, Debug)]
pub enum Error {
    /// A capture provider failed to enumerate processes or services.
    /// Fatal to the invocation; a partial snapshot is never trusted.
    #[error("capture failed: {0}")]
    Capture(String),

    /// An include/exclude pattern did not parse. Fatal before planning
    /// begins; nothing is executed.
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A delta item violated the one-side-absent invariant, typically from
    /// a hand-edited delta file.
    #[error("malformed delta item for {kind} '{name}': {reason}")]
    MalformedItem {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },
}

/// Result type for deltakit operations
pub type Result<T> = std::result::Result<T, Error>;
