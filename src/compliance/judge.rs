//! Compliance judges.

use async_trait::async_trait;
use genai::chat::ChatOptions;
use tracing::{debug, instrument};

use super::llm::ChatModel;
use super::rules::ComplianceRule;
use super::verdict::{ComplianceVerdict, Violation};
use super::{ComplianceError, ComplianceResult};

/// A draft plus the rules it is checked against.
#[derive(Debug, Clone, Copy)]
pub struct JudgeRequest<'a> {
    pub message: &'a str,
    pub rules: &'a [ComplianceRule],
    /// Product-level legal notes, if any.
    pub legal_notes: Option<&'a str>,
}

#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, request: &JudgeRequest<'_>) -> ComplianceResult<ComplianceVerdict>;
}

/// Rejects any draft containing a prohibited expression of a supplied rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalJudge;

impl LexicalJudge {
    pub fn new() -> Self {
        Self
    }

    pub fn violations(message: &str, rules: &[ComplianceRule]) -> Vec<Violation> {
        rules
            .iter()
            .flat_map(|rule| {
                rule.violations_in(message)
                    .into_iter()
                    .map(move |expression| Violation {
                        rule_id: rule.id.clone(),
                        title: rule.title.clone(),
                        reason: format!("'{}' 표현은 {}에 해당합니다", expression, rule.title),
                        expression,
                        severity: rule.severity,
                    })
            })
            .collect()
    }
}

#[async_trait]
impl Judge for LexicalJudge {
    async fn judge(&self, request: &JudgeRequest<'_>) -> ComplianceResult<ComplianceVerdict> {
        let violations = Self::violations(request.message, request.rules);
        if violations.is_empty() {
            Ok(ComplianceVerdict::approve("금지 표현이 발견되지 않았습니다"))
        } else {
            debug!(violations = violations.len(), "lexical judge rejected draft");
            Ok(ComplianceVerdict::reject(violations, "금지 표현이 포함되어 있습니다"))
        }
    }
}

const JUDGE_SYSTEM_PROMPT: &str = "당신은 대한민국 화장품법 광고 심의 전문가입니다. \
주어진 규칙에 따라 CRM 메시지의 위반 여부를 판단하고, 반드시 JSON 객체 하나만 출력하세요.";

/// Asks a chat model for a JSON verdict.
#[derive(Debug, Clone)]
pub struct LlmJudge {
    model: ChatModel,
    options: ChatOptions,
}

impl LlmJudge {
    pub fn new(model: ChatModel) -> Self {
        Self {
            model,
            options: ChatOptions::default().with_temperature(0.0),
        }
    }
}

pub fn build_judge_prompt(request: &JudgeRequest<'_>) -> String {
    let mut prompt = String::new();
    prompt.push_str("[검사 대상 메시지]\n");
    prompt.push_str(request.message);
    prompt.push_str("\n\n");

    if let Some(notes) = request.legal_notes.filter(|n| !n.trim().is_empty()) {
        prompt.push_str("[제품 법적 고지]\n");
        prompt.push_str(notes.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str("[적용 규칙]\n");
    for rule in request.rules {
        prompt.push_str(&format!(
            "- {} ({}, {}): {}\n  금지 예시: {}\n  허용 예시: {}\n",
            rule.id,
            rule.title,
            rule.severity,
            rule.description,
            rule.prohibited.join(", "),
            rule.allowed.join(", "),
        ));
    }

    prompt.push_str(
        "\n다음 형식의 JSON으로만 답하세요:\n\
{\"passed\": true/false, \"violated_rules\": [{\"rule_id\": \"\", \"rule_title\": \"\", \
\"violated_expression\": \"\", \"reason\": \"\", \"severity\": \"HIGH|MEDIUM|LOW\"}], \
\"reasoning\": \"\", \"confidence\": 0.0, \"suggestions\": \"\"}",
    );
    prompt
}

/// Parses a verdict from model output, tolerating code fences and prose
/// around the JSON object.
pub fn parse_verdict(raw: &str) -> ComplianceResult<ComplianceVerdict> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let body = match (start, end) {
        (Some(s), Some(e)) if s < e => &raw[s..=e],
        _ => {
            return Err(ComplianceError::Judgment {
                reason: "no JSON object in judge output".to_string(),
            });
        }
    };

    serde_json::from_str::<ComplianceVerdict>(body)
        .map(ComplianceVerdict::normalized)
        .map_err(|e| ComplianceError::Judgment {
            reason: format!("malformed verdict: {e}"),
        })
}

#[async_trait]
impl Judge for LlmJudge {
    #[instrument(skip(self, request), fields(model = %self.model.model(), rules = request.rules.len()))]
    async fn judge(&self, request: &JudgeRequest<'_>) -> ComplianceResult<ComplianceVerdict> {
        let raw = self
            .model
            .complete(
                JUDGE_SYSTEM_PROMPT.to_string(),
                build_judge_prompt(request),
                &self.options,
                |reason| ComplianceError::Judgment { reason },
            )
            .await?;
        parse_verdict(&raw)
    }
}
