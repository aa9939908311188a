use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::generator::{DraftRequest, MessageGenerator, RetryFeedback, TemplateGenerator};
use super::judge::{Judge, JudgeRequest};
use super::verdict::ComplianceVerdict;
use super::{ComplianceError, ComplianceResult};

/// Generator that replays scripted drafts, then falls back to the template.
#[derive(Debug, Default)]
pub struct MockGenerator {
    drafts: Mutex<VecDeque<String>>,
    feedback: Mutex<Vec<Option<RetryFeedback>>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drafts<I, S>(drafts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            drafts: Mutex::new(drafts.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Feedback received on each call, in order.
    pub fn feedback_seen(&self) -> Vec<Option<RetryFeedback>> {
        self.feedback.lock().clone()
    }
}

#[async_trait]
impl MessageGenerator for MockGenerator {
    async fn generate(
        &self,
        request: &DraftRequest<'_>,
        feedback: Option<&RetryFeedback>,
    ) -> ComplianceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.feedback.lock().push(feedback.cloned());

        if self.fail.load(Ordering::SeqCst) {
            return Err(ComplianceError::Generation {
                reason: "mock generator failure".to_string(),
            });
        }

        let scripted = self.drafts.lock().pop_front();
        Ok(scripted.unwrap_or_else(|| TemplateGenerator::render(request)))
    }
}

/// Judge that replays scripted pass/fail decisions, approving once the
/// script runs out.
#[derive(Debug, Default)]
pub struct MockJudge {
    script: Mutex<VecDeque<bool>>,
    reject_all: AtomicBool,
    fail: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` approves, `false` rejects.
    pub fn with_script<I: IntoIterator<Item = bool>>(script: I) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        let judge = Self::default();
        judge.reject_all.store(true, Ordering::SeqCst);
        judge
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Drafts judged so far, in order.
    pub fn messages_seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Judge for MockJudge {
    async fn judge(&self, request: &JudgeRequest<'_>) -> ComplianceResult<ComplianceVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(request.message.to_string());

        if self.fail.load(Ordering::SeqCst) {
            return Err(ComplianceError::Judgment {
                reason: "mock judge failure".to_string(),
            });
        }

        let passed = if self.reject_all.load(Ordering::SeqCst) {
            false
        } else {
            self.script.lock().pop_front().unwrap_or(true)
        };

        Ok(if passed {
            ComplianceVerdict::approve("mock approval")
        } else {
            ComplianceVerdict::reject(Vec::new(), "mock rejection")
        })
    }
}
