use std::sync::Arc;

use anyhow::Context;

use polaris_api::app::{self, AppServices};
use polaris_api::config::{AppConfig, StorageBackend};
use polaris_infra::store::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    polaris_observability::init();

    let cfg = AppConfig::load().context("loading configuration")?;
    tracing::info!(env = %cfg.env, backend = ?cfg.storage.backend, "starting polaris-api");

    let store: Arc<dyn DocumentStore> = match cfg.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        StorageBackend::Mongo => {
            let mongo = MongoDocumentStore::connect(&cfg.mongo.connection_string, &cfg.mongo.database)
                .await
                .context("connecting to MongoDB")?;
            mongo.initialize_indexes().await.context("creating MongoDB indexes")?;
            Arc::new(mongo)
        }
    };

    let services = Arc::new(AppServices::new(store, &cfg.jwt.secret_or_dev_default(), cfg.jwt.ttl()));
    services
        .domain
        .users
        .seed(&cfg.seed.super_admins)
        .await
        .context("seeding super admins")?;

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app::build_app(services)).await?;
    Ok(())
}
