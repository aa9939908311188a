//! In-process server for end-to-end tests.

use std::net::SocketAddr;

use petal::gateway::{HandlerState, create_router_with_state};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::fixtures::{Pipeline, PipelineConfig, build_pipeline};

#[derive(Default)]
pub struct TestServerConfig {
    pub pipeline: PipelineConfig,
}

pub struct TestServer {
    addr: SocketAddr,
    pub pipeline: Pipeline,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let pipeline = build_pipeline(config.pipeline).await;
    let state = HandlerState::new(pipeline.workflow.clone())
        .embedder_stub(true)
        .mock_provider(true);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        addr,
        pipeline,
        handle,
    })
}
