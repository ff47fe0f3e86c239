//! Console binary for the Life simulation.
//!
//! Wires the engine, the animator, a text renderer, and a stdin command
//! loop together, then runs until `quit`, end of input, or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `life-config.yaml` (or `$LIFE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine
//! 4. Spawn the animator with the console renderer
//! 5. Run the console until it exits
//! 6. Cancel the animator and log the result

mod console;
mod error;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use life_core::animator::{self, RenderCallback};
use life_core::config::LoggingConfig;
use life_core::{LifeConfig, LifeEngine, NoOpRender};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::ConsoleRenderer;

/// Environment variable naming the config file.
const CONFIG_PATH_ENV: &str = "LIFE_CONFIG";

/// Config file used when `LIFE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "life-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the console cannot be set
/// up, or the animator task fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("life-engine starting");
    info!(
        config_path = %config_path.display(),
        width = config.grid.width,
        height = config.grid.height,
        tick_interval_ms = config.animation.tick_interval_ms,
        save_path = %config.persistence.save_path.display(),
        "Configuration loaded"
    );

    // 3. Build the engine.
    let engine = Arc::new(LifeEngine::new(&config).map_err(EngineError::from)?);

    // 4. Spawn the animator.
    let render: Box<dyn RenderCallback> = if config.render.enabled {
        Box::new(ConsoleRenderer::new(&config.render))
    } else {
        Box::new(NoOpRender)
    };
    let handle = animator::spawn_animator(Arc::clone(&engine), render);

    // 5. Run the console.
    let exit = console::run(&engine, &config.render).await;

    // 6. Cancel the animator, even if the console failed.
    let summary = handle.shutdown().await.map_err(EngineError::from)?;
    animator::log_animator_end(&summary, &engine.frame());

    let exit = exit?;
    info!(exit = ?exit, "life-engine shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over
/// `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `$LIFE_CONFIG` or `life-config.yaml`.
///
/// A missing file yields defaults (still subject to env overrides).
fn load_config() -> Result<(LifeConfig, PathBuf), EngineError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let mut config = if path.exists() {
        LifeConfig::from_file(&path)?
    } else {
        LifeConfig::default()
    };
    config.apply_env_overrides()?;
    Ok((config, path))
}
