use serde::{Deserialize, Serialize};

use super::rules::Severity;

/// One violated rule in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    #[serde(default, alias = "rule_title")]
    pub title: String,
    /// Offending substring of the draft.
    #[serde(default, alias = "violated_expression")]
    pub expression: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub passed: bool,
    #[serde(default, alias = "violated_rules")]
    pub violations: Vec<Violation>,
    #[serde(default, alias = "reasoning")]
    pub rationale: String,
    /// In `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub suggestions: String,
}

impl ComplianceVerdict {
    pub fn approve(rationale: impl Into<String>) -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
            rationale: rationale.into(),
            confidence: 1.0,
            suggestions: String::new(),
        }
    }

    pub fn reject(violations: Vec<Violation>, rationale: impl Into<String>) -> Self {
        Self {
            passed: false,
            violations,
            rationale: rationale.into(),
            confidence: 1.0,
            suggestions: String::new(),
        }
    }

    /// A failed attempt that produced no judgeable draft.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            violations: Vec::new(),
            rationale: reason.into(),
            confidence: 0.0,
            suggestions: String::new(),
        }
    }

    /// A verdict listing violations never passes; confidence is clamped.
    pub fn normalized(mut self) -> Self {
        self.passed = self.passed && self.violations.is_empty();
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// One-line reason used in retry instructions and logs.
    pub fn summary(&self) -> String {
        if self.violations.is_empty() {
            return self.rationale.clone();
        }
        let expressions: Vec<&str> = self
            .violations
            .iter()
            .map(|v| {
                if v.expression.is_empty() {
                    v.title.as_str()
                } else {
                    v.expression.as_str()
                }
            })
            .collect();
        format!("화장품법 위반 표현 발견: {}", expressions.join(", "))
    }
}
