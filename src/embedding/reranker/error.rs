use thiserror::Error;

#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("rerank request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("reranker returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("invalid rerank response: {reason}")]
    InvalidResponse { reason: String },

    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<reqwest::Error> for RerankerError {
    fn from(err: reqwest::Error) -> Self {
        RerankerError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
