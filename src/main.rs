//! LibreSBC WebUI server
//!
//! Serves the single-page web UI and forwards API traffic to LibreSBC.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser
//!      │
//!      ▼
//!  ┌────────┐    ┌────────┐    ┌─────────┐
//!  │  net   │───▶│  http  │───▶│ routing │
//!  │ + TLS  │    │ server │    │  table  │
//!  └────────┘    └────────┘    └────┬────┘
//!                                   │
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!      ┌──────────┐           ┌──────────┐           ┌──────────┐
//!      │  health  │           │  proxy   │           │  assets  │
//!      │  probe   │           │forwarder │           │  bundle  │
//!      └──────────┘           └────┬─────┘           └──────────┘
//!                                  ▼
//!                            LibreSBC API
//!
//!   Cross-cutting: config · lifecycle · observability
//! ```

use std::process::ExitCode;

use clap::Parser;

use libre_webui::cli::Cli;
use libre_webui::config::load_config;
use libre_webui::lifecycle::{launch, watch_signals, Shutdown, StartupError};
use libre_webui::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(cli).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                module = "libresbc",
                function = "webui",
                action = e.action(),
                error = %e,
                "Fatal error, exiting"
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_config(&cli)?;

    print!("{}", logging::banner(&config));
    tracing::info!(
        listen = %config.listen_address(),
        upstream = %config.upstream,
        tls = config.tls.is_some(),
        webroot = %config.asset_root.display(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server = launch(&config, &shutdown).await?;
    tracing::info!(address = %server.local_addr(), "Accepting connections");

    tokio::spawn(watch_signals(shutdown));
    server.wait().await
}
