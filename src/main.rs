//! Status dashboard binary

use clap::Parser;
use status_dashboard::{Config, HtmlDocument, Renderer, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    initialize_tracing(&config.log_level);

    info!("Starting status dashboard v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Dashboard configuration - Source: {}, Container: #{}, Output: {}",
        config.source,
        config.container_id,
        config.output.display()
    );

    let renderer = Renderer::from_config(&config)?;

    let mut document = match &config.shell {
        Some(path) => HtmlDocument::load(path).await?,
        None => HtmlDocument::with_default_shell(),
    };

    let report = renderer.run(&config.container_id, &mut document).await;

    // Whatever was appended before a failure is still written out
    document.write_to(&config.output).await?;
    info!(
        "Wrote {} cards to {}",
        report.cards_appended,
        config.output.display()
    );

    if !report.is_complete() {
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize structured logging
fn initialize_tracing(default_level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
