//! Depression Predictor - Main Entry Point
//!
//! Loads the trained classifier once, then serves the input form and its
//! prediction results over local HTTP.

use anyhow::{Context, Result};
use depression_predictor::{
    config::{AppConfig, LoggingConfig},
    models::inference::InferenceEngine,
    web::{self, AppState},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Depression Predictor");

    // Load the model; a missing artifact aborts startup
    let engine = InferenceEngine::new(&config)?;
    info!(
        model = %engine.model_name(),
        path = %config.model.path.display(),
        "Model ready"
    );

    let state = AppState::new(engine);
    let metrics = state.metrics.clone();
    let app = web::router(state);

    let listener = config.server.bind().await?;
    info!(
        "Prediction form available at http://{}",
        listener.local_addr().context("Listener has no local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Depression Predictor shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("depression_predictor={},tower_http=info", logging.level)))
        .context("Invalid log filter")?;

    match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
