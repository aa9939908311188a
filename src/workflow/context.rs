use serde::{Deserialize, Serialize};
use std::fmt;

use super::{WorkflowError, WorkflowResult};
use crate::channel::Channel;
use crate::compliance::Violation;
use crate::hashing::Signature;
use crate::intent::Intent;
use crate::profile::{CustomerProfile, Season};
use crate::ranking::ScoredCandidate;

/// Steps of a message request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    ResolveBrand,
    RetrieveCandidates,
    CacheLookup,
    ComplianceLoop,
    CacheStore,
    Finalize,
}

impl Node {
    pub fn as_str(&self) -> &'static str {
        match self {
            Node::ResolveBrand => "resolve_brand",
            Node::RetrieveCandidates => "retrieve_candidates",
            Node::CacheLookup => "cache_lookup",
            Node::ComplianceLoop => "compliance_loop",
            Node::CacheStore => "cache_store",
            Node::Finalize => "finalize",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied inputs of a message request.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRequest {
    pub profile: CustomerProfile,
    pub channel: Channel,
    pub intent: Intent,
    /// Free-text weather, used only with [`Intent::Weather`].
    pub weather: Option<String>,
    pub brand: Option<String>,
    pub persona: Option<String>,
    pub disable_cache: bool,
    /// Brands of recent purchases or clicks, repeated per interaction.
    pub recent_brands: Vec<String>,
    /// Defaults to the current season.
    pub season: Option<Season>,
}

impl WorkflowRequest {
    pub fn new(profile: CustomerProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    pub fn weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn disable_cache(mut self, disable: bool) -> Self {
        self.disable_cache = disable;
        self
    }

    pub fn recent_brands(mut self, brands: Vec<String>) -> Self {
        self.recent_brands = brands;
        self
    }

    pub fn season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }
}

/// The per-request state every node reads and writes.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub request: WorkflowRequest,
    pub brands: Vec<String>,
    pub candidate: Option<ScoredCandidate>,
    pub signature: Option<Signature>,
    pub cache_hit: bool,
    pub message: Option<String>,
    pub retry_count: u32,
    pub last_rejection: Option<String>,
    pub violations: Vec<Violation>,
    pub approved: bool,
    pub success: bool,
    visited: Vec<Node>,
}

impl WorkflowContext {
    pub fn new(request: WorkflowRequest) -> Self {
        Self {
            request,
            brands: Vec::new(),
            candidate: None,
            signature: None,
            cache_hit: false,
            message: None,
            retry_count: 0,
            last_rejection: None,
            violations: Vec::new(),
            approved: false,
            success: false,
            visited: Vec::new(),
        }
    }

    /// Records entry into `node`. Entering a node twice is an error.
    pub fn enter(&mut self, node: Node) -> WorkflowResult<()> {
        if self.visited.contains(&node) {
            return Err(WorkflowError::NodeReentered { node });
        }
        self.visited.push(node);
        Ok(())
    }

    pub fn visited(&self) -> &[Node] {
        &self.visited
    }

    pub fn persona_id(&self) -> &str {
        self.request.persona.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn weather(&self) -> &str {
        self.request.weather.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Brand of the chosen product, falling back to the first resolved brand.
    pub fn brand(&self) -> &str {
        self.candidate
            .as_ref()
            .map(|c| c.candidate.brand())
            .or_else(|| self.brands.first().map(String::as_str))
            .unwrap_or_default()
    }
}
