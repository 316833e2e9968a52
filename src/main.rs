//! Telco API Gateway
//!
//! The HTTP entry point of the telephony platform: decodes REST requests,
//! authenticates the caller, and forwards typed operations to the domain
//! manager services.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use telco_api_gateway::{
    config::{Environment, Settings},
    logging::RollingFileWriter,
    server::App,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Telco API Gateway
///
/// The HTTP-facing gateway of the telephony platform.
#[derive(Parser, Debug)]
#[command(name = "telco-api-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long)]
    env: Option<Environment>,

    /// Log file path for JSON logs (enables file logging with 10MB rotation)
    /// Example: --log-file /var/log/gateway/gateway.log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;

    // Override settings with CLI arguments
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }

    settings.validate()?;

    // Generate ephemeral access token for development
    let ephemeral_token = settings.generate_ephemeral_token();

    // Initialize tracing subscriber with JSON output
    init_tracing(&settings.log_level, args.log_file.as_ref());

    // Print ephemeral access token to console
    println!("\n{}", "=".repeat(60));
    println!("  Ephemeral access token (valid for this session only):");
    println!("  {}", ephemeral_token);
    println!("{}\n", "=".repeat(60));
    println!("  Usage:");
    println!(
        "    curl -H \"Authorization: Bearer {}\" http://{}:{}/v1.0/calls\n",
        ephemeral_token, settings.host, settings.port
    );
    println!("{}\n", "=".repeat(60));

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        "Starting application"
    );

    // Build the application
    let app = App::new(settings)?;

    // Run the server with graceful shutdown
    app.run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");

    Ok(())
}

/// Initialize tracing subscriber with the specified log level
/// Optionally writes to a rolling log file (10MB per file, max 5 files)
fn init_tracing(log_level: &str, log_file: Option<&PathBuf>) {
    // Build filter from RUST_LOG env var or use provided log level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // Console layer - always enabled, JSON format
    let console_layer = fmt::layer().json().with_filter(filter);

    // Build the subscriber
    let subscriber = tracing_subscriber::registry().with(console_layer);

    // Add file layer if log_file is specified
    if let Some(path) = log_file {
        let file_writer =
            RollingFileWriter::with_defaults(path).expect("Failed to create log file writer");

        let file_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_filter(file_filter);

        subscriber.with(file_layer).init();

        eprintln!(
            "Logging to file: {} (10MB rotation, max 5 files)",
            path.display()
        );
    } else {
        subscriber.init();
    }
}
