// src/config.rs

use std::env;
use dotenvy::dotenv;

pub const DEFAULT_PORT: u16 = 3002;

/// Credentials the client sends with `POST /api/hello` to receive the catalog.
pub const HELLO_WHO: &str = "qzicl";
pub const HELLO_ACTION: &str = "hello";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,

    /// Directory for the daily rolling log file.
    pub log_dir: String,

    /// JSON file replacing the embedded catalog when set.
    pub catalog_path: Option<String>,

    /// Browser origins allowed by CORS.
    ///
    /// Defaults to the Vite dev server (`http://localhost:5173`) and
    /// `http://localhost:3000` only. Any other origin, including a dev server
    /// on another port, is refused by browsers until listed in the
    /// comma-separated `CORS_ORIGINS` variable.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            catalog_path: None,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        let catalog_path = env::var("CATALOG_PATH").ok().filter(|p| !p.is_empty());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_origins);

        Self {
            host,
            port,
            rust_log,
            log_dir,
            catalog_path,
            cors_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
