use thiserror::Error;

use super::Node;
use crate::ranking::RankingError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Ranking(#[from] RankingError),

    /// A node was scheduled twice within one request.
    #[error("workflow node '{node}' entered twice")]
    NodeReentered { node: Node },

    #[error("workflow reached '{node}' without {missing}")]
    MissingState { node: Node, missing: &'static str },
}

impl WorkflowError {
    pub fn is_internal(&self) -> bool {
        !matches!(self, WorkflowError::Ranking(_))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
