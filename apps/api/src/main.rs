mod auth;
mod config;
mod db;
mod errors;
mod integrations;
mod models;
mod plans;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::integrations::HttpEventProducer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate profiles API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    // Downstream event endpoints: audit log plus the three integrations.
    let audit = Arc::new(HttpEventProducer::new(config.audit_events_url.clone()));
    let google = Arc::new(HttpEventProducer::new(config.google_integration_url.clone()));
    let active_campaign = Arc::new(HttpEventProducer::new(
        config.active_campaign_integration_url.clone(),
    ));
    let hubspot = Arc::new(HttpEventProducer::new(config.hubspot_integration_url.clone()));
    info!("Event producers initialized");

    let state = AppState {
        db,
        audit,
        google,
        active_campaign,
        hubspot,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
