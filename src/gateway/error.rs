use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{PETAL_STATUS_ERROR, PETAL_STATUS_HEADER};
use crate::ranking::RankingError;
use crate::workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no candidates: {0}")]
    NoCandidates(String),

    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<RankingError> for GatewayError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidRequest { .. } => GatewayError::InvalidRequest(err.to_string()),
            RankingError::NoCandidates | RankingError::NoCandidatesForBrandFilter { .. } => {
                GatewayError::NoCandidates(err.to_string())
            }
            RankingError::RetrievalUnavailable { .. } | RankingError::RerankUnavailable { .. } => {
                GatewayError::Unavailable(err.to_string())
            }
        }
    }
}

impl From<WorkflowError> for GatewayError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Ranking(e) => e.into(),
            other => GatewayError::InternalError(other.to_string()),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NoCandidates(_) => StatusCode::NOT_FOUND,
            GatewayError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            PETAL_STATUS_HEADER,
            HeaderValue::from_static(PETAL_STATUS_ERROR),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
