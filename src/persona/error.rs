use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading persona or brand data.
pub enum PersonaError {
    #[error("failed to read persona catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse persona catalog '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate persona id '{id}'")]
    DuplicatePersona { id: String },
}

pub type PersonaResult<T> = Result<T, PersonaError>;
