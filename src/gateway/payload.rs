use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use crate::channel::Channel;
use crate::intent::Intent;
use crate::profile::{CustomerProfile, RawProfile};
use crate::ranking::{RankingRequest, ScoredCandidate};
use crate::workflow::{WorkflowOutcome, WorkflowRequest};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageRequestBody {
    pub customer: RawProfile,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub weather_detail: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub disable_cache: bool,
    #[serde(default)]
    pub recent_brands: Vec<String>,
}

fn parse_intent(label: Option<&str>) -> Result<Intent, GatewayError> {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => label
            .parse()
            .map_err(|e| GatewayError::InvalidRequest(format!("{e}"))),
        None => Ok(Intent::default()),
    }
}

fn parse_profile(raw: RawProfile) -> Result<CustomerProfile, GatewayError> {
    let profile = CustomerProfile::from(raw);
    if profile.customer_id.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "customer.customer_id must not be empty".to_string(),
        ));
    }
    Ok(profile)
}

impl TryFrom<MessageRequestBody> for WorkflowRequest {
    type Error = GatewayError;

    fn try_from(body: MessageRequestBody) -> Result<Self, Self::Error> {
        let intent = parse_intent(body.intent.as_deref())?;
        let mut request = WorkflowRequest::new(parse_profile(body.customer)?)
            .channel(
                body.channel
                    .as_deref()
                    .map(Channel::from_label)
                    .unwrap_or_default(),
            )
            .intent(intent)
            .disable_cache(body.disable_cache)
            .recent_brands(body.recent_brands);

        if let Some(weather) = body.weather_detail {
            request = request.weather(weather);
        }
        if let Some(brand) = body.brand.filter(|b| !b.trim().is_empty()) {
            request = request.brand(brand);
        }
        if let Some(persona) = body.persona.filter(|p| !p.trim().is_empty()) {
            request = request.persona(persona);
        }
        Ok(request)
    }
}

/// Chosen product as reported to callers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub discount_rate: u8,
    pub final_score: f32,
}

impl From<&ScoredCandidate> for ProductSummary {
    fn from(scored: &ScoredCandidate) -> Self {
        Self {
            id: scored.candidate.id().to_string(),
            name: scored.candidate.name().to_string(),
            brand: scored.candidate.brand().to_string(),
            discount_rate: scored.candidate.discount_rate(),
            final_score: scored.final_score,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponseBody {
    pub message: String,
    pub approved: bool,
    pub retry_count: u32,
    pub cache_hit: bool,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl From<WorkflowOutcome> for MessageResponseBody {
    fn from(outcome: WorkflowOutcome) -> Self {
        Self {
            product: outcome.product.as_ref().map(ProductSummary::from),
            signature: outcome.signature.map(|s| s.to_hex()),
            message: outcome.message,
            approved: outcome.approved,
            retry_count: outcome.retry_count,
            cache_hit: outcome.cache_hit,
            brand: outcome.brand,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationRequestBody {
    pub customer: RawProfile,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl TryFrom<RecommendationRequestBody> for RankingRequest {
    type Error = GatewayError;

    fn try_from(body: RecommendationRequestBody) -> Result<Self, Self::Error> {
        let intent = parse_intent(body.intent.as_deref())?;
        let brands = body
            .brands
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();

        let mut request = RankingRequest::new(parse_profile(body.customer)?)
            .brands(brands)
            .intent(intent);
        if let Some(top_k) = body.top_k {
            request = request.top_k(top_k);
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationResponseBody {
    pub candidates: Vec<ScoredCandidate>,
}
