use std::sync::Arc;

use crate::workflow::Workflow;

#[derive(Clone)]
pub struct HandlerState {
    pub workflow: Arc<Workflow>,

    /// Embeddings come from the in-process stub.
    pub embedder_stub: bool,

    /// Drafts and verdicts come from in-process stand-ins.
    pub mock_provider: bool,
}

impl HandlerState {
    pub fn new(workflow: Arc<Workflow>) -> Self {
        Self {
            workflow,
            embedder_stub: false,
            mock_provider: false,
        }
    }

    pub fn embedder_stub(mut self, stub: bool) -> Self {
        self.embedder_stub = stub;
        self
    }

    pub fn mock_provider(mut self, mock: bool) -> Self {
        self.mock_provider = mock;
        self
    }
}
