//! Foodie HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use foodie::config::Config;
use foodie::dataset::load_restaurants;
use foodie::embedding::{MiniLmConfig, MiniLmEmbedder};
use foodie::gateway::{AppState, create_router};
use foodie::index::VectorIndex;
use foodie::llm::{MistralConfig, MistralReranker};
use foodie::search::RankingPipeline;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Foodie starting"
    );

    // Dataset and index failures are loud but not fatal: the service stays
    // up and answers with empty results.
    let restaurants = match load_restaurants(&config.data_path) {
        Ok(restaurants) => restaurants,
        Err(e) => {
            tracing::error!(
                path = %config.data_path.display(),
                error = %e,
                "Failed to load restaurant dataset; searches will return no results"
            );
            Vec::new()
        }
    };

    let index = VectorIndex::open_or_unavailable(&config.index_path);

    let minilm_config = if let Some(path) = &config.model_path {
        MiniLmConfig::new(path.clone())
    } else {
        tracing::warn!("No FOODIE_MODEL_PATH configured, running embedder in stub mode");
        MiniLmConfig::stub()
    };
    let embedder = MiniLmEmbedder::load(minilm_config)?;

    let mistral_config = MistralConfig::from_env();
    if !mistral_config.is_enabled() {
        tracing::warn!("MISTRAL_API_KEY not set, LLM re-ranking disabled");
    }
    let reranker = MistralReranker::new(mistral_config);

    let pipeline = Arc::new(RankingPipeline::new(
        Arc::new(restaurants),
        Arc::new(index),
        Arc::new(embedder),
        Arc::new(reranker),
    ));

    let router = create_router(AppState::new(pipeline));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Foodie listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Foodie shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
