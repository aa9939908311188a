//! Bounded-retry compliance loop.
//!
//! A draft is generated, checked against the relevant rules by a [`Judge`],
//! and regenerated with the rejection reason until it passes or the retry
//! ceiling is reached. Exhaustion is not an error: a vetted fallback from the
//! [`FallbackCatalog`] is returned instead, never the rejected draft.

pub mod error;
pub mod fallback;
pub mod generator;
pub mod judge;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rules;
pub mod verdict;


pub use error::{ComplianceError, ComplianceResult};
pub use fallback::{FallbackCatalog, FallbackSet};
pub use generator::{
    CUSTOMER_NAME_PLACEHOLDER, DraftRequest, LlmMessageGenerator, MessageGenerator,
    RetryFeedback, TemplateGenerator,
};
pub use judge::{Judge, JudgeRequest, LexicalJudge, LlmJudge};
pub use llm::ChatModel;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockGenerator, MockJudge};
pub use rules::{ComplianceRule, RuleIndex, Severity, builtin_rules, load_rules};
pub use verdict::{ComplianceVerdict, Violation};

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_SEMANTIC_RULES};
use crate::hashing::Signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    /// Regenerations allowed after the first draft. Default: `5`.
    pub max_retries: u32,
    /// Semantic rule matches added on top of lexical hits. Default: `5`.
    pub semantic_rules: usize,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            semantic_rules: DEFAULT_SEMANTIC_RULES,
        }
    }
}

impl ComplianceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::default().max_retries(config.max_retries)
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn semantic_rules(mut self, semantic_rules: usize) -> Self {
        self.semantic_rules = semantic_rules;
        self
    }
}

/// A draft request plus the context signature used for fallback selection.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub draft: DraftRequest<'a>,
    pub signature: &'a Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Approved draft, or the fallback when `approved` is false.
    pub message: String,
    pub approved: bool,
    pub retry_count: u32,
    /// Drafting attempts, always `retry_count + 1`.
    pub drafts: u32,
    pub last_verdict: Option<ComplianceVerdict>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Drafting,
    Validating,
    Approved,
    Rejected,
    Exhausted,
}

pub struct ComplianceLoop {
    generator: Arc<dyn MessageGenerator>,
    judge: Arc<dyn Judge>,
    rules: Arc<RuleIndex>,
    fallbacks: Arc<FallbackCatalog>,
    config: ComplianceConfig,
}

impl fmt::Debug for ComplianceLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceLoop")
            .field("rules", &self.rules.len())
            .field("fallbacks", &self.fallbacks.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ComplianceLoop {
    pub fn new(
        generator: Arc<dyn MessageGenerator>,
        judge: Arc<dyn Judge>,
        rules: Arc<RuleIndex>,
        fallbacks: Arc<FallbackCatalog>,
        config: ComplianceConfig,
    ) -> Self {
        Self {
            generator,
            judge,
            rules,
            fallbacks,
            config,
        }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Drives the loop to `Approved` or `Exhausted`.
    ///
    /// Generator and judge errors count as a rejected attempt.
    #[instrument(skip(self, request), fields(brand = %request.draft.brand, channel = %request.draft.constraints.channel))]
    pub async fn run(&self, request: &GenerationRequest<'_>) -> GenerationOutcome {
        let max_retries = self.config.max_retries;
        let mut state = LoopState::Drafting;
        let mut retry_count = 0u32;
        let mut drafts = 0u32;
        let mut draft = String::new();
        let mut feedback: Option<RetryFeedback> = None;
        let mut verdict: Option<ComplianceVerdict> = None;

        loop {
            state = match state {
                LoopState::Drafting => {
                    drafts += 1;
                    match self
                        .generator
                        .generate(&request.draft, feedback.as_ref())
                        .await
                    {
                        Ok(text) if !text.trim().is_empty() => {
                            draft = text;
                            LoopState::Validating
                        }
                        Ok(_) => {
                            verdict = Some(ComplianceVerdict::failure("생성된 메시지가 비어 있습니다"));
                            LoopState::Rejected
                        }
                        Err(e) => {
                            warn!(error = %e, attempt = drafts, "draft generation failed");
                            verdict = Some(ComplianceVerdict::failure(e.to_string()));
                            LoopState::Rejected
                        }
                    }
                }
                LoopState::Validating => {
                    let rules = self
                        .rules
                        .select(&draft, self.config.semantic_rules)
                        .await;
                    let judge_request = JudgeRequest {
                        message: &draft,
                        rules: &rules,
                        legal_notes: request.draft.product.legal_notes.as_deref(),
                    };
                    match self.judge.judge(&judge_request).await {
                        Ok(v) => {
                            let v = v.normalized();
                            let next = if v.passed {
                                LoopState::Approved
                            } else {
                                debug!(
                                    attempt = drafts,
                                    violations = v.violations.len(),
                                    reason = %v.summary(),
                                    "draft rejected"
                                );
                                LoopState::Rejected
                            };
                            verdict = Some(v);
                            next
                        }
                        Err(e) => {
                            warn!(error = %e, attempt = drafts, "compliance judgment failed");
                            verdict = Some(ComplianceVerdict::failure(e.to_string()));
                            LoopState::Rejected
                        }
                    }
                }
                LoopState::Rejected if retry_count < max_retries => {
                    retry_count += 1;
                    let last = verdict.as_ref();
                    feedback = Some(RetryFeedback {
                        attempt: retry_count,
                        max_retries,
                        reason: last.map(ComplianceVerdict::summary).unwrap_or_default(),
                        violations: last.map(|v| v.violations.clone()).unwrap_or_default(),
                    });
                    LoopState::Drafting
                }
                LoopState::Rejected => LoopState::Exhausted,
                LoopState::Approved => {
                    info!(retry_count, "draft approved");
                    return GenerationOutcome {
                        message: draft,
                        approved: true,
                        retry_count,
                        drafts,
                        last_verdict: verdict,
                    };
                }
                LoopState::Exhausted => {
                    let message = self.fallbacks.select(
                        request.draft.brand,
                        request.draft.constraints.channel,
                        request.signature,
                    );
                    warn!(
                        retry_count,
                        signature = %request.signature.to_hex(),
                        "retries exhausted, using fallback message"
                    );
                    return GenerationOutcome {
                        message,
                        approved: false,
                        retry_count,
                        drafts,
                        last_verdict: verdict,
                    };
                }
            };
        }
    }
}
