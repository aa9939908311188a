use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::constants::PETAL_STATUS_HEADER;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    MessageRequestBody, MessageResponseBody, RecommendationRequestBody,
    RecommendationResponseBody,
};
use crate::gateway::state::HandlerState;
use crate::ranking::RankingRequest;
use crate::workflow::WorkflowRequest;

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

#[instrument(skip(state, body), fields(customer = tracing::field::Empty))]
pub async fn messages_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let body: MessageRequestBody = parse_body(body)?;
    let request = WorkflowRequest::try_from(body)?;
    tracing::Span::current().record(
        "customer",
        tracing::field::display(&request.profile.customer_id),
    );

    let outcome = state.workflow.run(request).await?;
    let status = outcome.status();
    info!(status, retry_count = outcome.retry_count, "Message request served");

    let mut headers = HeaderMap::new();
    headers.insert(PETAL_STATUS_HEADER, HeaderValue::from_static(status));

    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponseBody::from(outcome)),
    )
        .into_response())
}

#[instrument(skip(state, body))]
pub async fn recommendations_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let body: RecommendationRequestBody = parse_body(body)?;
    let request = RankingRequest::try_from(body)?;

    let candidates = state.workflow.ranking().rank(&request).await?;
    debug!(candidates = candidates.len(), "Recommendations ranked");

    Ok((
        StatusCode::OK,
        Json(RecommendationResponseBody { candidates }),
    )
        .into_response())
}
