use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use card_quiz::config::BuildConfig;
use card_quiz::env::{self, EnvStatus};

fn main() -> anyhow::Result<()> {
    // Load .env file if present (once, before anything reads the environment)
    let env_status = env::init();

    // Initialize logging; stdout is reserved for the config document
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Card Quiz v{}", env!("CARGO_PKG_VERSION"));

    match env_status {
        EnvStatus::Loaded(path) => info!("Environment loaded from {}", path.display()),
        EnvStatus::Missing => info!("No .env file found, using process environment"),
        EnvStatus::Invalid(reason) => warn!("Ignoring malformed .env file: {}", reason),
    }

    // Load configuration
    let config = BuildConfig::load_or_default();
    config.validate().context("Invalid build configuration")?;

    info!(
        "Configuration loaded: dev server {}:{}, source root {}",
        config.server.host,
        config.server.port,
        config
            .source_root()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );

    let document = serde_json::to_string_pretty(&config).context("Failed to encode configuration")?;
    println!("{document}");

    Ok(())
}
