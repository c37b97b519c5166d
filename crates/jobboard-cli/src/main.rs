//! jobboard - command line client for the forensic accounting job board.
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every request attempt.

mod commands;
mod utils;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobboard_core::{ApiClient, Config, TokenStore};

use commands::{Command, Context};

/// Initialize the tracing subscriber. The returned guard flushes buffered
/// log lines when dropped and must outlive the runtime.
fn init_tracing() -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_target(false))
        .with(filter)
        .init();

    guard
}

fn build_context() -> Result<Context> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let tokens = match config.token_backend() {
        Ok(Some(backend)) => TokenStore::new(backend),
        Ok(None) => TokenStore::in_memory(),
        Err(e) => {
            warn!(error = %e, "Token storage unavailable, token will not persist");
            TokenStore::in_memory()
        }
    };

    let client = ApiClient::new(config.client_config(), Arc::new(tokens))?;
    info!(base_url = %client.base_url(), "Client ready");

    Ok(Context { client, config })
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, commands::USAGE);
            return ExitCode::from(2);
        }
    };

    let result = match build_context() {
        Ok(mut ctx) => commands::run(&mut ctx, command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
