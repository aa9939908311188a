use thiserror::Error;

#[derive(Debug, Error)]
/// Why a ranking request produced no candidates.
pub enum RankingError {
    /// Embedding, similarity search or catalog fetch failed.
    #[error("retrieval unavailable during {stage}: {message}")]
    RetrievalUnavailable {
        stage: &'static str,
        message: String,
    },

    /// The brand filter matched nothing. The unfiltered pool is never consulted.
    #[error("no candidates for brand filter {brands:?}")]
    NoCandidatesForBrandFilter { brands: Vec<String> },

    #[error("no candidates found")]
    NoCandidates,

    /// Pairwise scoring failed or had nothing to score.
    #[error("re-ranking unavailable: {message}")]
    RerankUnavailable { message: String },

    #[error("invalid ranking request: {reason}")]
    InvalidRequest { reason: String },
}

impl RankingError {
    /// `true` when an upstream collaborator failed, as opposed to an empty result.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            RankingError::RetrievalUnavailable { .. } | RankingError::RerankUnavailable { .. }
        )
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
