use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use minihttpd::config::{CONFIG_ENV, Config};
use minihttpd::server;

/// Minimal HTTP/1.0 file server.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Port to listen on; an ephemeral port is chosen and reported when omitted
    port: Option<u16>,

    /// YAML configuration file
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref(), cli.port)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.logging.tracing_level())
        .init();

    if cfg.server.max_connections.is_some() || cfg.server.client_timeout_secs.is_some() {
        tracing::info!(
            max_connections = ?cfg.server.max_connections,
            client_timeout_secs = ?cfg.server.client_timeout_secs,
            "Connection hardening enabled"
        );
    }

    tokio::select! {
        res = server::listener::run(Arc::new(cfg)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
