//! file-discovery daemon.
//!
//! # Architecture Overview
//!
//! ```text
//! source files ──▶ discovery core ──▶ HTTP surface ──▶ polling clients
//!  (JSON/YAML/        (listers +        (JSON query
//!   TOML)              provider)         marshaling)
//!        ▲                │
//!        └── scheduler ───┘  (periodic mtime-gated refresh)
//!
//! Cross-cutting: config, observability (tracing + metrics), lifecycle.
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use file_discovery::config::load_config;
use file_discovery::discovery::Provider;
use file_discovery::http::HttpServer;
use file_discovery::lifecycle::Shutdown;
use file_discovery::observability::{logging, metrics};
use file_discovery::scheduler::RefreshScheduler;

#[derive(Parser)]
#[command(name = "file-discovery")]
#[command(about = "File-backed resource discovery server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "discovery.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        config = %cli.config.display(),
        sources = config.provider.files.len(),
        re_eval_secs = config.provider.re_eval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Every configured source must load here; a source that cannot be read
    // or decoded at startup is a configuration error, not a runtime event.
    let provider = Arc::new(Provider::new(&config.provider)?);

    let shutdown = Shutdown::new();
    RefreshScheduler::new(
        provider.clone(),
        Duration::from_secs(config.provider.re_eval_secs),
    )
    .start(&shutdown);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let server = HttpServer::new(&config.server, provider);
    server.run(listener).await?;

    shutdown.trigger();
    tracing::info!("Shutdown complete");
    Ok(())
}
