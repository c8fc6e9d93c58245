// src/main.rs

use qzicl::config::Config;
use qzicl::data;
use qzicl::routes;
use qzicl::state::AppState;
use qzicl::store::InMemorySessionStore;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "qzicl.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let catalog = data::load(config.catalog_path.as_deref()).inspect_err(|e| {
        tracing::error!("Failed to load quiz catalog: {}", e);
    })?;

    tracing::info!(
        "Loaded {} topics and {} quiz categories",
        catalog.topics.len(),
        catalog.quizzes.len()
    );

    // Sessions live only as long as the process.
    let state = AppState::new(catalog, InMemorySessionStore::shared(), config.clone());

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Qzicl server listening on {}", addr);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
