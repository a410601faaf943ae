use std::path::PathBuf;

use clap::Parser;
use depot::config::Config;
use depot::server;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Minimal HTTP/1.1 server with static and dynamic resources.
#[derive(Debug, Parser)]
#[command(name = "depot", version)]
struct Args {
    /// Address to bind, e.g. 127.0.0.1
    host: String,

    /// Port to listen on
    port: u16,

    /// Optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cfg.server.host = args.host;
    cfg.server.port = args.port;

    let shutdown = CancellationToken::new();

    tokio::select! {
        res = server::run(&cfg, shutdown.clone()) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    }

    Ok(())
}
