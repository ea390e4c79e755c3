mod telemetry;

use std::sync::Arc;

use ai_llm_service::{OpenAiService, config::default_config};
use anyhow::Context;
use api::AppState;
use contextor::Contextor;
use rag_store::{PgVectorIndex, RagConfig, RagStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine: the variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    telemetry::init().context("failed to install tracing subscriber")?;

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env file present but unreadable");
        }
    }

    let embedder = Arc::new(
        OpenAiService::new(default_config::config_embedding()?)
            .context("failed to build embedding client")?,
    );
    let completer = Arc::new(
        OpenAiService::new(default_config::config_completion()?)
            .context("failed to build completion client")?,
    );

    info!(
        embedding_model = embedder.model(),
        completion_model = completer.model(),
        "LLM clients ready"
    );

    let rag_cfg = RagConfig::from_env()?;
    let index = Arc::new(PgVectorIndex::connect(&rag_cfg).await?);
    let store = RagStore::new(rag_cfg, embedder, index.clone())?;

    let state = AppState::new(Arc::new(Contextor::new(store, completer)));
    let addr = api::listen_address()?;

    let served = api::start(&addr, state).await;

    index.close().await;
    served?;

    info!("RAG relay shut down");
    Ok(())
}
