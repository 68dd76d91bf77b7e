use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blogcollab_server::config::AppConfig;
use blogcollab_server::database::init_db;
use blogcollab_server::mailer::LogMailer;
use blogcollab_server::state::AppState;
use blogcollab_server::store::{ContentStore, MemoryStore, SeaStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store: Arc<dyn ContentStore> = if config.database.is_memory() {
        info!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let db = init_db(&config.database.url)
            .await
            .context("Failed to connect to database")?;
        info!("Database connected and schema synced");
        Arc::new(SeaStore::new(db))
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        store,
        mailer: Arc::new(LogMailer),
        config,
    };
    let app = blogcollab_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/scalar", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
