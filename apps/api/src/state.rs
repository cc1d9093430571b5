use std::sync::Arc;

use sqlx::PgPool;

use crate::integrations::EventProducer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Audit-event producer; invoked on every successful mutation.
    pub audit: Arc<dyn EventProducer>,
    pub google: Arc<dyn EventProducer>,
    pub active_campaign: Arc<dyn EventProducer>,
    pub hubspot: Arc<dyn EventProducer>,
}
