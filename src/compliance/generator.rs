//! Message drafting.
//!
//! Drafts are templates: the customer's name is left as the
//! `{{customer_name}}` placeholder and substituted after approval, so one
//! approved draft can be reused across customers sharing a context.

use async_trait::async_trait;
use genai::chat::ChatOptions;
use std::fmt::Write as _;
use tracing::instrument;

use super::llm::ChatModel;
use super::verdict::Violation;
use super::{ComplianceError, ComplianceResult};
use crate::catalog::Product;
use crate::channel::ChannelConstraints;
use crate::intent::Intent;
use crate::persona::{BrandGuideline, Persona};
use crate::profile::CustomerProfile;

pub const CUSTOMER_NAME_PLACEHOLDER: &str = "{{customer_name}}";

const GENERATION_TEMPERATURE: f64 = 0.7;

/// Everything a generator needs to write one draft.
#[derive(Debug, Clone, Copy)]
pub struct DraftRequest<'a> {
    pub brand: &'a str,
    pub guideline: Option<&'a BrandGuideline>,
    pub persona: Option<&'a Persona>,
    pub product: &'a Product,
    pub profile: &'a CustomerProfile,
    pub intent: Intent,
    /// Only rendered for weather intent.
    pub weather: Option<&'a str>,
    pub constraints: &'a ChannelConstraints,
}

/// Why the previous draft was refused.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryFeedback {
    /// Retry number, starting at 1.
    pub attempt: u32,
    pub max_retries: u32,
    pub reason: String,
    pub violations: Vec<Violation>,
}

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &DraftRequest<'_>,
        feedback: Option<&RetryFeedback>,
    ) -> ComplianceResult<String>;
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

/// System prompt: sender voice, receiver persona, situation, channel limits,
/// then the retry notice when there is one.
pub fn build_system_prompt(request: &DraftRequest<'_>, feedback: Option<&RetryFeedback>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "당신은 {}의 전문 CRM 카피라이터입니다. 아래 조건을 모두 지켜 메시지를 작성하세요.\n",
        request.brand
    );

    out.push_str("[1. 화자: 브랜드 페르소나 (Sender)]\n");
    let _ = writeln!(out, "- 브랜드: {}", request.brand);
    if let Some(g) = request.guideline {
        let _ = writeln!(out, "- 그룹: {}", g.group);
        let _ = writeln!(out, "- 톤앤매너: {}", g.tone);
        let _ = writeln!(out, "- 핵심 가치: {}", g.focus);
        let _ = writeln!(out, "- 작성 규칙: {}", join_or(&g.rules, "없음"));
    }

    out.push_str("\n[2. 청자: 타겟 페르소나 (Receiver)]\n");
    match request.persona {
        Some(p) => {
            let _ = writeln!(out, "- 페르소나: {}", p.name);
            let _ = writeln!(out, "- 설명: {}", p.description);
            let _ = writeln!(out, "- 선호 톤: {}", p.tone);
            let _ = writeln!(out, "- 관심 키워드: {}", join_or(&p.keywords, "없음"));
        }
        None => out.push_str("- 일반 고객\n"),
    }

    out.push_str("\n[3. 상황 (Context)]\n");
    let _ = writeln!(
        out,
        "- 발송 목적: {} ({})",
        request.intent.as_str(),
        request.intent.description()
    );
    if request.intent.is_weather() {
        if let Some(weather) = request.weather.filter(|w| !w.trim().is_empty()) {
            let _ = writeln!(out, "- 날씨: {}", weather.trim());
        }
    }

    let c = request.constraints;
    out.push_str("\n[4. 채널 제약]\n");
    let _ = writeln!(out, "- 채널: {}", c.channel);
    let _ = writeln!(out, "- 제목: {}토큰 이내", c.title_limit);
    let _ = writeln!(out, "- 본문: {}토큰 이내", c.body_limit);
    let _ = writeln!(out, "- 구조:\n{}", c.structure);
    for line in c.guidelines {
        let _ = writeln!(out, "- {line}");
    }

    out.push_str(
        "\n화장품법을 준수하세요. 치료·완치 등 의약품 오인 표현, 즉시·100% 등 절대적 효능 표현, \
최고·1등 등 근거 없는 최상급 표현을 사용하지 마세요.\n",
    );

    if let Some(f) = feedback {
        let _ = write!(
            out,
            "\n⚠️ 이전 메시지가 화장품법 위반으로 거부되었습니다\n재시도 횟수: {}/{}\n이전 거부 이유: {}\n\
위 문제를 반드시 수정하여 다시 작성하세요.\n",
            f.attempt, f.max_retries, f.reason
        );
        for v in &f.violations {
            let _ = writeln!(out, "- [{}] '{}': {}", v.rule_id, v.expression, v.reason);
        }
    }
    out
}

pub fn build_user_prompt(request: &DraftRequest<'_>) -> String {
    let profile = request.profile;
    let product = request.product;
    let mut out = String::new();

    out.push_str("[고객 프로필]\n");
    let _ = writeln!(out, "- 이름: {CUSTOMER_NAME_PLACEHOLDER}");
    let _ = writeln!(out, "- 피부 타입: {}", join_or(&profile.skin_type_terms(), "정보 없음"));
    let _ = writeln!(out, "- 피부 고민: {}", join_or(&profile.concern_terms(), "정보 없음"));
    let _ = writeln!(out, "- 관심 키워드: {}", join_or(&profile.keywords, "없음"));

    out.push_str("\n[추천 제품]\n");
    let _ = writeln!(out, "- 제품명: {}", product.name);
    if product.price.discount_rate > 0 {
        let _ = writeln!(
            out,
            "- 브랜드: {} ({}% 할인 중)",
            product.brand, product.price.discount_rate
        );
    } else {
        let _ = writeln!(out, "- 브랜드: {}", product.brand);
    }
    let _ = writeln!(out, "- 설명: {}", product.content);
    let _ = writeln!(out, "- 리뷰 키워드: {}", join_or(&product.review.top_keywords, "없음"));

    let _ = write!(
        out,
        "\n고객 이름 자리에는 반드시 {CUSTOMER_NAME_PLACEHOLDER} 를 그대로 사용하세요. \
제목과 본문만 출력하세요."
    );
    out
}

/// Drafts messages with a chat model.
#[derive(Debug, Clone)]
pub struct LlmMessageGenerator {
    model: ChatModel,
}

impl LlmMessageGenerator {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl MessageGenerator for LlmMessageGenerator {
    #[instrument(skip(self, request, feedback), fields(model = %self.model.model(), brand = %request.brand))]
    async fn generate(
        &self,
        request: &DraftRequest<'_>,
        feedback: Option<&RetryFeedback>,
    ) -> ComplianceResult<String> {
        let options = ChatOptions::default()
            .with_temperature(GENERATION_TEMPERATURE)
            .with_max_tokens(request.constraints.body_limit + 100);

        self.model
            .complete(
                build_system_prompt(request, feedback),
                build_user_prompt(request),
                &options,
                |reason| ComplianceError::Generation { reason },
            )
            .await
    }
}

/// Deterministic drafts assembled from the product and intent.
///
/// Used when no model provider is configured. Wording avoids every
/// built-in prohibited expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(request: &DraftRequest<'_>) -> String {
        let product = request.product;
        let title = match request.intent {
            Intent::Promotional if product.price.discount_rate > 0 => format!(
                "[{}] {}님께만 드리는 {}% 혜택",
                request.brand, CUSTOMER_NAME_PLACEHOLDER, product.price.discount_rate
            ),
            Intent::Launch => format!("[{}] 새로운 {} 소식", request.brand, product.name),
            Intent::Weather => format!(
                "[{}] {}님, 오늘 날씨에 어울리는 케어",
                request.brand, CUSTOMER_NAME_PLACEHOLDER
            ),
            _ => format!("[{}] {}님을 위한 추천", request.brand, CUSTOMER_NAME_PLACEHOLDER),
        };

        let mut body = format!("{}님의 데일리 루틴에 {}을(를) 더해 보세요.", CUSTOMER_NAME_PLACEHOLDER, product.name);
        if let Some(keyword) = product.review.top_keywords.first() {
            let _ = write!(body, " 고객 리뷰에서 '{keyword}' 평가를 받은 제품이에요.");
        }
        if product.price.discount_rate > 0 {
            let _ = write!(body, " 지금 {}% 할인된 가격으로 만나보세요.", product.price.discount_rate);
        }
        format!("{title}\n{body}")
    }
}

#[async_trait]
impl MessageGenerator for TemplateGenerator {
    async fn generate(
        &self,
        request: &DraftRequest<'_>,
        _feedback: Option<&RetryFeedback>,
    ) -> ComplianceResult<String> {
        Ok(Self::render(request))
    }
}
