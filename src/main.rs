//! Back Me Up server
//!
//! Loads configuration, wires the dialog runtime to the configured state
//! store and scorer, and serves the messaging endpoint.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use back_me_up::adapters::scoring::{AzureMlConfig, AzureMlScorer, MockTreatmentScorer};
use back_me_up::adapters::storage::{FileStateStore, InMemoryStateStore, RedisStateStore};
use back_me_up::adapters::{messages_router, MessagesAppState};
use back_me_up::application::{
    ProcessTurnHandler, RankTreatmentsHandler, RecommendTreatmentHandler,
};
use back_me_up::config::{AppConfig, ScoringConfig, ServerConfig, StorageBackend, StorageConfig};
use back_me_up::domain::dialog::{DialogRegistry, DialogRuntime};
use back_me_up::domain::survey::register_back_pain_dialogs;
use back_me_up::ports::{StateStore, TreatmentScorer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let mut registry = DialogRegistry::new();
    register_back_pain_dialogs(&mut registry)?;
    tracing::info!(dialogs = registry.len(), "Dialog registry built");

    let store = state_store(&config.storage).await?;
    let scorer = treatment_scorer(&config.scoring)?;

    let runtime = DialogRuntime::new(Arc::new(registry), store);
    let recommender = RecommendTreatmentHandler::new(
        RankTreatmentsHandler::new(scorer).with_timeout(config.scoring.timeout()),
    );
    let state = MessagesAppState::new(ProcessTurnHandler::new(runtime, recommender));
    let app = messages_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "Back Me Up listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn state_store(
    storage: &StorageConfig,
) -> Result<Arc<dyn StateStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn StateStore> = match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory state store; conversations are lost on restart");
            Arc::new(InMemoryStateStore::new())
        }
        StorageBackend::File => {
            tracing::info!(path = %storage.path, "Using file state store");
            Arc::new(FileStateStore::new(storage.path()))
        }
        StorageBackend::Redis => {
            let url = storage.redis_url.as_deref().unwrap_or_default();
            let mut store = RedisStateStore::connect(url)
                .await?
                .with_ttl_secs(storage.ttl_secs);
            if let Some(prefix) = &storage.redis_prefix {
                store = store.with_prefix(prefix.clone());
            }
            tracing::info!(?store, "Using Redis state store");
            Arc::new(store)
        }
    };
    Ok(store)
}

fn treatment_scorer(
    scoring: &ScoringConfig,
) -> Result<Arc<dyn TreatmentScorer>, Box<dyn std::error::Error>> {
    match (&scoring.endpoint, &scoring.api_key) {
        (Some(endpoint), Some(api_key)) if !endpoint.is_empty() => {
            let config = AzureMlConfig::new(endpoint.clone(), api_key.expose_secret().clone())
                .with_timeout(scoring.timeout());
            tracing::info!(endpoint = %config.endpoint(), "Using Azure ML treatment scorer");
            Ok(Arc::new(AzureMlScorer::new(config)?))
        }
        _ => {
            tracing::warn!("No scoring endpoint configured; using mock treatment scorer");
            Ok(Arc::new(MockTreatmentScorer::demo()))
        }
    }
}
