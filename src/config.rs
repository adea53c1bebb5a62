//! Environment-driven configuration

use anyhow::Result;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. When absent the service runs on the
    /// in-memory store (useful for demos and local development).
    pub database_url: Option<String>,
    pub nats_url: Option<String>,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8084".to_string())
            .parse()?;
        Ok(Self {
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            nats_url: std::env::var("NATS_URL").ok(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "owner".to_string()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "owner@example.com".to_string()),
        })
    }
}
