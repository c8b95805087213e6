//! Sanad Daemon - accessibility assistant page runtime
//!
//! Reads input surface lines from stdin, prints on-screen messages to stdout
//! and logs to stderr.

use anyhow::Result;
use clap::Parser;
use sanad_common::config::Config;
use sanadd::app::{App, AppEvent};
use sanadd::input;
use sanadd::platform::StdoutSink;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sanadd")]
#[command(about = "Sanad - accessibility assistant runtime", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to /etc/sanad/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default config to this path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(path) = cli.init_config {
        Config::save_default(&path)?;
        return Ok(());
    }

    info!("Sanad daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli.config));
    // the stdin reader blocks in a read that cannot be cancelled
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_from_path(&path)?,
        None => Config::load(),
    };

    let (app, events) = App::new(config, Box::new(StdoutSink));
    let tx = app.sender();

    tokio::spawn(read_stdin(tx.clone()));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            let _ = tx.send(AppEvent::Shutdown);
        }
    });

    app.run(events).await;
    info!("Shutting down gracefully");
    Ok(())
}

/// Forward stdin lines to the handler loop; EOF closes the page.
async fn read_stdin(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => match input::parse_line(&line) {
                Ok(Some(event)) => AppEvent::Input(event),
                Ok(None) => continue,
                Err(e) => AppEvent::Rejected(e),
            },
            Ok(None) => AppEvent::Shutdown,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                AppEvent::Shutdown
            }
        };

        let closing = matches!(event, AppEvent::Shutdown);
        if tx.send(event).is_err() || closing {
            break;
        }
    }
}
