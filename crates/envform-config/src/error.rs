//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing configuration file could not be read or written.
    #[error("configuration store unavailable")]
    StoreUnavailable {
        /// Operation identifier.
        operation: &'static str,
        /// Path of the backing file.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// A built-in field pattern failed to compile.
    #[error("failed to compile field pattern")]
    PatternCompile {
        /// Field the pattern belongs to.
        field: &'static str,
        /// Source regex error.
        source: regex::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn store_unavailable_keeps_message_constant_and_source() {
        let err = ConfigError::StoreUnavailable {
            operation: "env_store.load",
            path: PathBuf::from("/.env"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "configuration store unavailable");
        assert!(err.source().is_some());
    }
}
