//! force-browser: redirect pages that open in the native browser.
//!
//! This is the application entry point. It loads configuration from an
//! optional TOML file and the environment, initializes tracing, compiles the
//! redirect page template, sets up the Axum router, and starts the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use force_browser::config::{AppConfig, DEFAULT_LOG_FILTER};
use force_browser::http::start_server;
use force_browser::templates::init_templates;
use force_browser::{create_router, AppState};

/// force-browser: serve pages that reopen links in the system browser
#[derive(Parser, Debug)]
#[command(name = "force-browser", version, about)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration file
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level filter (e.g., "force_browser=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration; PORT / --port wins over the file
    let config = AppConfig::load(args.config.as_ref())?.with_port(args.port);

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let (text_layer, json_layer) = if config.logging.is_json() {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::info!(
        config_file = ?args.config,
        host = %config.http.host,
        port = config.http.port,
        allowed_schemes = ?config.redirect.allowed_schemes,
        "Loaded configuration"
    );

    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    let state = AppState::new(config.clone(), tera);
    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
