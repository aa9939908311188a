//! Compliance rule corpus and rule retrieval.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ComplianceError, ComplianceResult};
use crate::embedding::{Embedder, cosine_similarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One advertising rule with the expressions it forbids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub id: String,
    #[serde(alias = "rule_title")]
    pub title: String,
    #[serde(default, alias = "rule_description")]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub legal_basis: String,
    /// Expressions that violate the rule wherever they appear.
    #[serde(default, alias = "prohibited_examples")]
    pub prohibited: Vec<String>,
    #[serde(default, alias = "allowed_examples")]
    pub allowed: Vec<String>,
}

impl ComplianceRule {
    /// Prohibited expressions present in `message`, matched case-insensitively.
    pub fn violations_in(&self, message: &str) -> Vec<String> {
        let lower = message.to_lowercase();
        self.prohibited
            .iter()
            .filter(|p| !p.trim().is_empty() && lower.contains(&p.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Text embedded for semantic rule retrieval.
    pub fn embedding_text(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.title,
            self.description,
            self.prohibited.join(", ")
        )
    }
}

fn rule(
    id: &str,
    title: &str,
    description: &str,
    severity: Severity,
    category: &str,
    prohibited: &[&str],
    allowed: &[&str],
) -> ComplianceRule {
    ComplianceRule {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        category: category.to_string(),
        legal_basis: "화장품법 제13조 (부당한 표시·광고 행위 등의 금지)".to_string(),
        prohibited: prohibited.iter().map(|s| s.to_string()).collect(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

/// Cosmetics advertising rules: absolute efficacy, medical expressions,
/// exaggeration and skin-disease claims.
pub fn builtin_rules() -> Vec<ComplianceRule> {
    vec![
        rule(
            "absolute-efficacy",
            "절대적 효능 표현 금지",
            "효능·효과를 절대적이거나 즉각적인 것으로 단정하는 표현",
            Severity::High,
            "절대적 효능",
            &[
                "완치", "치료", "개선", "회복", "재생", "100%", "즉시", "즉각", "바로", "단번에",
                "영구적", "영구", "영원히", "평생",
            ],
            &["가꿔주는", "도움을 주는", "케어"],
        ),
        rule(
            "medical-expression",
            "의학적 표현 금지",
            "의약품으로 오인할 수 있는 의학적 표현이나 전문가 지칭",
            Severity::High,
            "의학적 표현",
            &[
                "의학적", "임상적", "의사", "한의사", "약사", "처방", "진단", "질병", "질환", "증상",
            ],
            &["피부 테스트 완료"],
        ),
        rule(
            "exaggeration",
            "과장 광고 금지",
            "객관적 근거 없는 최상급·순위 표현",
            Severity::Medium,
            "과장 광고",
            &[
                "세계 최고", "국내 최고", "최고급", "최상급", "1등", "넘버원", "No.1", "#1", "혁명적",
                "기적", "마법",
            ],
            &["많은 고객이 선택한"],
        ),
        rule(
            "skin-disease",
            "피부 질환 관련 표현 금지",
            "피부 질환의 예방·치료를 암시하는 표현",
            Severity::High,
            "피부 질환",
            &[
                "아토피", "여드름 치료", "건선", "습진", "피부염", "알레르기 치료", "각질 제거",
            ],
            &["피부 결 정돈", "민감한 피부를 위한"],
        ),
    ]
}

/// Reads a JSON array of rules from `path`.
pub fn load_rules(path: &Path) -> ComplianceResult<Vec<ComplianceRule>> {
    let raw = std::fs::read_to_string(path).map_err(|source| ComplianceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules: Vec<ComplianceRule> =
        serde_json::from_str(&raw).map_err(|source| ComplianceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), rules = rules.len(), "loaded compliance rules");
    Ok(rules)
}

/// Selects rules relevant to a draft: lexical hits first, then the closest
/// rules by embedding similarity.
pub struct RuleIndex {
    rules: Vec<ComplianceRule>,
    vectors: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl fmt::Debug for RuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleIndex")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl RuleIndex {
    /// Embeds every rule up front.
    pub async fn build(
        rules: Vec<ComplianceRule>,
        embedder: Arc<dyn Embedder>,
    ) -> ComplianceResult<Self> {
        let vectors = try_join_all(rules.iter().map(|r| {
            let embedder = embedder.clone();
            let text = r.embedding_text();
            async move { embedder.embed(&text).await }
        }))
        .await
        .map_err(|e| ComplianceError::RuleIndex {
            reason: e.to_string(),
        })?;

        debug!(rules = rules.len(), "built compliance rule index");
        Ok(Self {
            rules,
            vectors,
            embedder,
        })
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Indices of rules with a prohibited expression in `message`.
    pub fn lexical_hits(&self, message: &str) -> Vec<usize> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !rule.violations_in(message).is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Lexical hits plus up to `semantic_k` further rules by similarity.
    ///
    /// When the message cannot be embedded every rule is returned.
    pub async fn select(&self, message: &str, semantic_k: usize) -> Vec<ComplianceRule> {
        let mut chosen = self.lexical_hits(message);

        if semantic_k > 0 && chosen.len() < self.rules.len() {
            match self.embedder.embed(message).await {
                Ok(query) => {
                    let mut ranked: Vec<(usize, f32)> = self
                        .vectors
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !chosen.contains(i))
                        .map(|(i, v)| (i, cosine_similarity(&query, v)))
                        .collect();
                    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                    chosen.extend(ranked.into_iter().take(semantic_k).map(|(i, _)| i));
                }
                Err(e) => {
                    warn!(error = %e, "rule retrieval embedding failed, using every rule");
                    return self.rules.clone();
                }
            }
        }

        chosen.into_iter().map(|i| self.rules[i].clone()).collect()
    }
}
