use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub everflow_api_key: String,
    pub everflow_network_id: Option<String>,
    pub everflow_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            everflow_api_key: env::var("EVERFLOW_API_KEY")
                .context("EVERFLOW_API_KEY must be set")?,
            everflow_network_id: env::var("EVERFLOW_NETWORK_ID").ok(),
            everflow_base_url: env::var("EVERFLOW_BASE_URL").ok(),
        })
    }
}
