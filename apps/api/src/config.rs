use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub audit_events_url: String,
    pub google_integration_url: String,
    pub active_campaign_integration_url: String,
    pub hubspot_integration_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            audit_events_url: require_env("AUDIT_EVENTS_URL")?,
            google_integration_url: require_env("GOOGLE_INTEGRATION_URL")?,
            active_campaign_integration_url: require_env("ACTIVE_CAMPAIGN_INTEGRATION_URL")?,
            hubspot_integration_url: require_env("HUBSPOT_INTEGRATION_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
