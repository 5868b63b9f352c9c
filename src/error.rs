//! Crate-wide error type and `Result` alias.
//!
//! The taxonomy is deliberately small: store connectivity failures propagate
//! unmodified, unrecognized enumeration values are rejected before any
//! traversal starts, and everything else belongs to the outer layers (config,
//! serialization, I/O). A vertex missing from the store is NOT an error; it
//! yields an empty result so callers can render "nothing found" uniformly.

use thiserror::Error;

/// Errors produced by the lineage engine and its surrounding layers.
#[derive(Debug, Error)]
pub enum LineageError {
    /// The backing graph store could not be reached or failed internally.
    /// Propagated to the caller unmodified; the engine performs no retries.
    #[error("graph store unavailable: {0}")]
    Store(#[from] rusqlite::Error),

    /// A non-SQLite adapter failed. Carries the adapter's own message.
    #[error("graph source failure: {0}")]
    Adapter(String),

    /// The caller supplied a view name outside the supported set.
    #[error("unknown view: {0}")]
    InvalidView(String),

    /// The caller supplied a scope name outside the supported set.
    #[error("unknown scope: {0}")]
    InvalidScope(String),

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failure, e.g. malformed property payloads.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scope_message_names_the_input() {
        let err = LineageError::InvalidScope("sideways".to_string());
        assert_eq!(err.to_string(), "unknown scope: sideways");
    }

    #[test]
    fn store_errors_convert_from_rusqlite() {
        let err: LineageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, LineageError::Store(_)));
        assert!(err.to_string().starts_with("graph store unavailable"));
    }
}
