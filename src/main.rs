//! Petal HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use petal::cache::build_message_store;
use petal::catalog::{Catalog, MemoryCatalog, product_points};
use petal::compliance::{
    ChatModel, ComplianceConfig, ComplianceLoop, FallbackCatalog, Judge, LexicalJudge, LlmJudge,
    LlmMessageGenerator, MessageGenerator, RuleIndex, TemplateGenerator, builtin_rules,
    load_rules,
};
use petal::config::Config;
use petal::embedding::{
    Embedder, EmbedderConfig, RerankerConfig, build_embedder, reranker::build_reranker,
};
use petal::gateway::{HandlerState, create_router_with_state};
use petal::persona::{BrandScorer, PersonaCatalog};
use petal::ranking::{RankingConfig, RankingEngine};
use petal::vectordb::QdrantProductIndex;
use petal::workflow::Workflow;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;
    let timeout = Duration::from_secs(config.http_timeout_secs);

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        mock_provider = config.mock_provider,
        "Petal starting"
    );

    let embedder_config = match &config.embedding_url {
        Some(url) => EmbedderConfig::new(url.clone())
            .model(config.embedding_model.clone())
            .api_key(config.embedding_api_key.clone()),
        None => EmbedderConfig::stub(),
    };
    let embedder = build_embedder(embedder_config.timeout(timeout))?;

    let reranker_config = match &config.reranker_url {
        Some(url) => RerankerConfig::new(url.clone()),
        None => RerankerConfig::stub(),
    };
    let scorer = build_reranker(reranker_config.timeout(timeout))?;

    let catalog = match &config.catalog_path {
        Some(path) => MemoryCatalog::from_path(path)?,
        None => {
            tracing::warn!("No PETAL_CATALOG_PATH configured, using the built-in sample catalog");
            MemoryCatalog::builtin()
        }
    };

    let index = QdrantProductIndex::new(&config.qdrant_url, config.collection.clone())?;
    let points = product_points(catalog.products(), embedder.as_ref()).await?;
    let indexed = async {
        index.ensure_collection(embedder.dimension() as u64).await?;
        index.upsert_products(points).await
    };
    if let Err(e) = indexed.await {
        tracing::warn!("Failed to index catalog: {}. Readiness will report pending.", e);
    } else {
        tracing::info!(products = catalog.len(), "Catalog indexed.");
    }

    let ranking = Arc::new(RankingEngine::new(
        embedder.clone(),
        Arc::new(index),
        Arc::new(catalog),
        scorer,
        RankingConfig::from_config(&config),
    ));

    let personas = match &config.personas_path {
        Some(path) => PersonaCatalog::from_path(path)?,
        None => PersonaCatalog::builtin(),
    };
    let brands = BrandScorer::new(Arc::new(personas), config.default_brand.clone());

    let rules = match &config.rules_path {
        Some(path) => load_rules(path)?,
        None => builtin_rules(),
    };
    let rules = Arc::new(RuleIndex::build(rules, embedder.clone()).await?);

    let fallbacks = match &config.fallbacks_path {
        Some(path) => FallbackCatalog::from_path(path)?,
        None => FallbackCatalog::builtin(),
    };

    let (generator, judge): (Arc<dyn MessageGenerator>, Arc<dyn Judge>) = if config.mock_provider {
        tracing::warn!("Mock provider enabled, drafts come from templates");
        (Arc::new(TemplateGenerator::new()), Arc::new(LexicalJudge::new()))
    } else {
        let client = genai::Client::default();
        (
            Arc::new(LlmMessageGenerator::new(ChatModel::new(
                client.clone(),
                config.generation_model.clone(),
                timeout,
            ))),
            Arc::new(LlmJudge::new(ChatModel::new(
                client,
                config.judge_model.clone(),
                timeout,
            ))),
        )
    };

    let compliance = Arc::new(ComplianceLoop::new(
        generator,
        judge,
        rules,
        Arc::new(fallbacks),
        ComplianceConfig::from_config(&config),
    ));

    let cache = build_message_store(config.cache_path.clone(), config.cache_capacity)?;
    let workflow = Arc::new(Workflow::new(brands, ranking, cache, compliance));

    let state = HandlerState::new(workflow)
        .embedder_stub(embedder.is_stub())
        .mock_provider(config.mock_provider);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Petal shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PETAL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
