use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Compliance stage failures.
///
/// Generation and judgment failures never leave the compliance loop; they
/// count as a rejected attempt.
pub enum ComplianceError {
    #[error("message generation failed: {reason}")]
    Generation { reason: String },

    #[error("compliance judgment failed: {reason}")]
    Judgment { reason: String },

    #[error("model call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("failed to build rule index: {reason}")]
    RuleIndex { reason: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ComplianceResult<T> = Result<T, ComplianceError>;
