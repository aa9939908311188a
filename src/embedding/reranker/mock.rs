use async_trait::async_trait;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{PairScorer, RerankerError};

/// Pair scorer with scripted scores.
///
/// A document scores the value of the first registered marker it contains,
/// or the default score when none match.
#[derive(Debug, Default)]
pub struct MockPairScorer {
    markers: RwLock<Vec<(String, f32)>>,
    default_score: f32,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockPairScorer {
    pub fn new(default_score: f32) -> Self {
        Self {
            default_score,
            ..Default::default()
        }
    }

    /// Documents containing `marker` score `score`.
    pub fn with_marker(self, marker: impl Into<String>, score: f32) -> Self {
        if let Ok(mut markers) = self.markers.write() {
            markers.push((marker.into(), score));
        }
        self
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PairScorer for MockPairScorer {
    async fn score(&self, _query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RerankerError::RequestFailed {
                reason: "simulated reranker outage".to_string(),
            });
        }

        let markers = self
            .markers
            .read()
            .map_err(|_| RerankerError::InvalidResponse {
                reason: "lock poisoned".to_string(),
            })?;

        Ok(documents
            .iter()
            .map(|doc| {
                markers
                    .iter()
                    .find(|(marker, _)| doc.contains(marker.as_str()))
                    .map(|(_, score)| *score)
                    .unwrap_or(self.default_score)
            })
            .collect())
    }

    fn is_stub(&self) -> bool {
        true
    }
}
