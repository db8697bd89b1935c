//! Wasteland headless client.
//!
//! Composition root: loads content and configuration, builds the
//! [`runtime::Runtime`], runs a scripted session and shuts down.
//!
//! # Examples
//!
//! ```bash
//! WASTELAND_SEED=42 WASTELAND_CLASS=medic RUST_LOG=debug cargo run -p wasteland-client
//! ```

mod config;
mod demo;

use std::sync::Arc;

use anyhow::Result;

use game_content::ContentFactory;
use runtime::{FileStateRepository, Runtime, RuntimeConfig};

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(seed = config.world_seed, class = %config.class, "Starting wasteland client");

    // 1. Content
    let (game_config, registry) = match &config.data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            (factory.load_config()?, factory.load_registry(config.world_seed)?)
        }
        None => (
            game_core::GameConfig::default(),
            game_content::registry(config.world_seed),
        ),
    };

    // 2. Runtime, clocked by the script
    let runtime_config = RuntimeConfig {
        game_config,
        frame_interval: None,
        world_seed: config.world_seed,
        ..RuntimeConfig::default()
    };
    let mut builder = Runtime::builder()
        .config(runtime_config)
        .catalog(Arc::new(registry))
        .character(config.class, config.player_name.clone());
    if let Some(background) = config.background {
        builder = builder.background(background);
    }
    for t in &config.traits {
        builder = builder.with_trait(*t);
    }
    if let Some(dir) = &config.save_dir {
        builder = builder.repository(Arc::new(FileStateRepository::new(dir)?));
    }
    let runtime = builder.build().await?;
    let handle = runtime.handle();

    // 3. Session
    let loggers = demo::spawn_event_log(&handle);
    let outcome = demo::run(&handle, config.frame_ms, config.save_dir.is_some()).await;

    drop(handle);
    runtime.shutdown().await?;
    for logger in loggers {
        logger.abort();
    }

    outcome?;
    tracing::info!("Client shutdown complete");
    Ok(())
}
