use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Constructed once at startup and passed around via `AppState` —
/// nothing in the service reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub secret_key: String,
    pub admin_token: String,
    pub allowed_origins: String,
    pub data_dir: String,
    pub public_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "storage/app.db".to_string()),
            secret_key: require_env("SECRET_KEY")?,
            admin_token: require_env("ADMIN_TOKEN")?,
            allowed_origins: std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "data/entries".to_string()),
            public_dir: std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// CORS origins: `*` means any origin, otherwise a comma-separated list.
    pub fn cors_origins(&self) -> Vec<String> {
        if self.allowed_origins.trim() == "*" {
            return vec!["*".to_string()];
        }
        self.allowed_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
