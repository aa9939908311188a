//! Per-request workflow controller.
//!
//! ```text
//! resolve_brand -> retrieve_candidates -> cache_lookup
//! cache_lookup --hit--> finalize
//! cache_lookup --miss--> compliance_loop
//! compliance_loop --approved--> cache_store -> finalize
//! compliance_loop --exhausted--> finalize
//! ```
//!
//! Each node reads and writes one [`WorkflowContext`]; the next node is chosen
//! from context fields alone. No node runs twice.

pub mod context;
pub mod error;
pub mod personalize;

#[cfg(test)]
mod tests;

pub use context::{Node, WorkflowContext, WorkflowRequest};
pub use error::{WorkflowError, WorkflowResult};
pub use personalize::personalize;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::cache::MessageStore;
use crate::catalog::Product;
use crate::compliance::{ComplianceLoop, DraftRequest, GenerationRequest};
use crate::constants::{PETAL_STATUS_FALLBACK, PETAL_STATUS_GENERATED, PETAL_STATUS_HIT};
use crate::hashing::{Signature, SignatureInput, signature};
use crate::persona::BrandScorer;
use crate::ranking::{RankingEngine, RankingRequest, ScoredCandidate};

/// Result of one message request.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    /// Personalized message.
    pub message: String,
    pub approved: bool,
    pub retry_count: u32,
    pub cache_hit: bool,
    pub brand: String,
    pub product: Option<ScoredCandidate>,
    pub signature: Option<Signature>,
    #[serde(skip)]
    pub visited: Vec<Node>,
}

impl WorkflowOutcome {
    /// `hit`, `generated` or `fallback`.
    pub fn status(&self) -> &'static str {
        if self.cache_hit {
            PETAL_STATUS_HIT
        } else if self.approved {
            PETAL_STATUS_GENERATED
        } else {
            PETAL_STATUS_FALLBACK
        }
    }
}

pub struct Workflow {
    brands: BrandScorer,
    ranking: Arc<RankingEngine>,
    cache: Arc<dyn MessageStore>,
    compliance: Arc<ComplianceLoop>,
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("cache", &self.cache.name())
            .field("compliance", &self.compliance)
            .finish()
    }
}

impl Workflow {
    pub fn new(
        brands: BrandScorer,
        ranking: Arc<RankingEngine>,
        cache: Arc<dyn MessageStore>,
        compliance: Arc<ComplianceLoop>,
    ) -> Self {
        Self {
            brands,
            ranking,
            cache,
            compliance,
        }
    }

    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.name()
    }

    #[instrument(
        skip(self, request),
        fields(customer = %request.profile.customer_id, channel = %request.channel, intent = %request.intent)
    )]
    pub async fn run(&self, request: WorkflowRequest) -> WorkflowResult<WorkflowOutcome> {
        let mut ctx = WorkflowContext::new(request);
        let mut next = Some(Node::ResolveBrand);

        while let Some(node) = next {
            ctx.enter(node)?;
            debug!(node = %node, "entering workflow node");
            next = match node {
                Node::ResolveBrand => self.resolve_brand(&mut ctx),
                Node::RetrieveCandidates => self.retrieve_candidates(&mut ctx).await?,
                Node::CacheLookup => self.cache_lookup(&mut ctx).await?,
                Node::ComplianceLoop => self.compliance_loop(&mut ctx).await?,
                Node::CacheStore => self.cache_store(&mut ctx).await?,
                Node::Finalize => Self::finalize(&mut ctx)?,
            };
        }

        let outcome = WorkflowOutcome {
            message: ctx.message.take().unwrap_or_default(),
            approved: ctx.approved,
            retry_count: ctx.retry_count,
            cache_hit: ctx.cache_hit,
            brand: ctx.brand().to_string(),
            product: ctx.candidate.take(),
            signature: ctx.signature,
            visited: ctx.visited().to_vec(),
        };
        info!(
            status = outcome.status(),
            retry_count = outcome.retry_count,
            brand = %outcome.brand,
            "message request complete"
        );
        Ok(outcome)
    }

    fn resolve_brand(&self, ctx: &mut WorkflowContext) -> Option<Node> {
        let resolution = self.brands.resolve(
            ctx.request.persona.as_deref(),
            &ctx.request.recent_brands,
            ctx.request.brand.as_deref(),
        );
        debug!(brands = ?resolution.brands, source = ?resolution.source, "brand set resolved");
        ctx.brands = resolution.brands;
        Some(Node::RetrieveCandidates)
    }

    async fn retrieve_candidates(&self, ctx: &mut WorkflowContext) -> WorkflowResult<Option<Node>> {
        let mut request = RankingRequest::new(ctx.request.profile.clone())
            .brands(ctx.brands.clone())
            .intent(ctx.request.intent)
            .top_k(1);
        if let Some(season) = ctx.request.season {
            request = request.season(season);
        }

        let best = self.ranking.rank(&request).await?.into_iter().next();
        let Some(best) = best else {
            return Err(WorkflowError::MissingState {
                node: Node::RetrieveCandidates,
                missing: "a ranked candidate",
            });
        };

        let input = SignatureInput {
            brand: best.candidate.brand(),
            persona: ctx.persona_id(),
            intent: ctx.request.intent,
            weather: ctx.weather(),
            product_name: best.candidate.name(),
            channel: ctx.request.channel,
            profile: &ctx.request.profile,
        };
        ctx.signature = Some(signature(&input));
        ctx.candidate = Some(best);
        Ok(Some(Node::CacheLookup))
    }

    async fn cache_lookup(&self, ctx: &mut WorkflowContext) -> WorkflowResult<Option<Node>> {
        if ctx.request.disable_cache {
            debug!("cache disabled for request");
            return Ok(Some(Node::ComplianceLoop));
        }
        let signature = Self::signature(ctx, Node::CacheLookup)?;

        match self.cache.lookup(&signature).await {
            Ok(Some(message)) => {
                debug!(signature = %signature.to_hex(), "cache hit");
                ctx.message = Some(message);
                ctx.cache_hit = true;
                ctx.approved = true;
                Ok(Some(Node::Finalize))
            }
            Ok(None) => Ok(Some(Node::ComplianceLoop)),
            Err(e) => {
                warn!(error = %e, store = self.cache.name(), "cache lookup failed, treating as miss");
                Ok(Some(Node::ComplianceLoop))
            }
        }
    }

    async fn compliance_loop(&self, ctx: &mut WorkflowContext) -> WorkflowResult<Option<Node>> {
        let signature = Self::signature(ctx, Node::ComplianceLoop)?;
        let product: &Product = match ctx.candidate.as_ref() {
            Some(c) => &c.candidate.product,
            None => {
                return Err(WorkflowError::MissingState {
                    node: Node::ComplianceLoop,
                    missing: "a chosen candidate",
                });
            }
        };

        let brand = product.brand.as_str();
        let catalog = self.brands.catalog();
        let constraints = ctx.request.channel.constraints();
        let request = GenerationRequest {
            draft: DraftRequest {
                brand,
                guideline: catalog.guideline(brand),
                persona: ctx.request.persona.as_deref().and_then(|id| catalog.persona(id)),
                product,
                profile: &ctx.request.profile,
                intent: ctx.request.intent,
                weather: ctx.request.weather.as_deref(),
                constraints: &constraints,
            },
            signature: &signature,
        };

        let outcome = self.compliance.run(&request).await;

        let verdict = outcome.last_verdict;
        ctx.retry_count = outcome.retry_count;
        ctx.approved = outcome.approved;
        ctx.message = Some(outcome.message);
        if !outcome.approved {
            ctx.last_rejection = verdict.as_ref().map(|v| v.summary());
            ctx.violations = verdict.map(|v| v.violations).unwrap_or_default();
        }

        Ok(Some(if ctx.approved {
            Node::CacheStore
        } else {
            Node::Finalize
        }))
    }

    async fn cache_store(&self, ctx: &mut WorkflowContext) -> WorkflowResult<Option<Node>> {
        if ctx.request.disable_cache || !ctx.approved {
            return Ok(Some(Node::Finalize));
        }
        let signature = Self::signature(ctx, Node::CacheStore)?;

        if let Some(message) = ctx.message.as_deref() {
            if let Err(e) = self.cache.store(&signature, message).await {
                warn!(error = %e, store = self.cache.name(), "cache write failed");
            }
        }
        Ok(Some(Node::Finalize))
    }

    fn finalize(ctx: &mut WorkflowContext) -> WorkflowResult<Option<Node>> {
        let template = ctx.message.take().ok_or(WorkflowError::MissingState {
            node: Node::Finalize,
            missing: "a message",
        })?;
        ctx.message = Some(personalize(&template, ctx.request.profile.name.as_deref()));
        ctx.success = true;
        Ok(None)
    }

    fn signature(ctx: &WorkflowContext, node: Node) -> WorkflowResult<Signature> {
        ctx.signature.ok_or(WorkflowError::MissingState {
            node,
            missing: "a signature",
        })
    }
}
