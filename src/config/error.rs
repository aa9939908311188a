use std::path::PathBuf;
use thiserror::Error;

/// Problems found while reading `PETAL_*` variables or checking their values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PETAL_PORT '{value}' is not a usable port (1-65535)")]
    InvalidPort { value: String },

    #[error("PETAL_PORT '{value}' is not a number: {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("PETAL_BIND_ADDR '{value}' is not an IP address: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{name}='{value}' is not a valid number: {reason}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Parsed, but unusable (zero pool, negative alpha).
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("configured path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Data files (catalog, personas, rules, fallbacks) must be regular files.
    #[error("expected a file at {path}")]
    NotAFile { path: PathBuf },

    /// The cache path must be a directory when it exists.
    #[error("expected a directory at {path}")]
    NotADirectory { path: PathBuf },
}
