//! Threadfront - Self-hosted Storefront Service

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threadfront::api::{self, AppState};
use threadfront::config::Config;
use threadfront::publish::EventPublisher;
use threadfront::service::SharedStore;
use threadfront::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: SharedStore = match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres store");
            Arc::new(PgStore::connect(url).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let nats = match &config.nats_url {
        Some(url) => Some(async_nats::connect(url).await?),
        None => None,
    };

    let state = AppState::new(store, EventPublisher::new(nats));
    state
        .auth
        .bootstrap_admin(&config.admin_username, &config.admin_email, &config.admin_password)
        .await?;

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("threadfront listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
