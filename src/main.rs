// src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod models;
mod routes;

use config::{AppConfig, Credentials};
use db::{MetricsStore, MySqlStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MetricsStore>,
    pub credentials: Arc<Credentials>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    if cfg.credentials.is_empty() {
        tracing::warn!("no login accounts configured; every login will be rejected");
    } else {
        tracing::info!(accounts = cfg.credentials.len(), "login accounts loaded");
    }

    let pool = db::connect(&cfg.db).await?;
    let state = AppState {
        store: Arc::new(MySqlStore::new(pool)),
        credentials: Arc::new(cfg.credentials.clone()),
    };

    let app = routes::router(state);

    let addr = format!("{}:{}", cfg.bind_addr, cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
