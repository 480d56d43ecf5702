pub mod api;
pub mod config;
pub mod console;
pub mod controller;
pub mod refresh;
pub mod subtitle;

use api::{ApiError, HttpTransport, JobClient};
use controller::{DirectorySink, JobLifecycleController};
use refresh::JobListSynchronizer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("subtitle_desk=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config() -> config::AppConfig {
    let mut config = match config::config_path().and_then(|path| config::load_or_create(&path)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            config::AppConfig::default()
        }
    };
    config::apply_env_overrides(&mut config);
    config
}

/// Wires the controller to the configured service.
pub fn build_controller(config: &config::AppConfig) -> Result<JobLifecycleController, ApiError> {
    let transport = Arc::new(HttpTransport::new(&config.api_base_url)?);
    let client = Arc::new(JobClient::new(transport));
    let synchronizer = JobListSynchronizer::with_deadline(client.clone(), config.refresh_timeout());
    let sink = Arc::new(DirectorySink::new(config.export_dir()));

    Ok(JobLifecycleController::new(
        client,
        synchronizer,
        sink,
        config.subtitle_format(),
    ))
}

pub async fn run() {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = load_config();
    tracing::info!(
        "Using service {} (refresh deadline {} ms, export {:?} to {})",
        config.api_base_url,
        config.refresh_timeout_ms,
        config.subtitle_format(),
        config.export_dir().display()
    );

    let controller = match build_controller(&config) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Could not start: {}", e);
            return;
        }
    };
    if let Err(e) = console::run_console(controller).await {
        tracing::error!("Console stopped: {}", e);
    }
}
