use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{Embedder, EmbeddingError, EmbeddingResult, StubEmbedder};

/// [`StubEmbedder`] with call counting and a failure switch.
#[derive(Debug)]
pub struct MockEmbedder {
    inner: StubEmbedder,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: StubEmbedder::new(dimension),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                reason: "simulated embedding outage".to_string(),
            });
        }
        Ok(self.inner.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn is_stub(&self) -> bool {
        true
    }
}
