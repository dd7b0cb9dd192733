//! CLI entry point for dwl.

use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dwl_core::{DownloadEngine, EngineConfig, FileSaver, ReqwestClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

/// Exit code used when the run was stopped by Ctrl+C.
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    init_tracing(&args);

    debug!(?args, "CLI arguments parsed");

    let links = if args.links.is_empty() {
        read_links_from_stdin()?
    } else {
        args.links.clone()
    };

    if links.is_empty() {
        info!("No links provided. Pass links as arguments or pipe them via stdin.");
        info!("Example: dwl --threads 8 https://example.com/file.zip");
        return Ok(ExitCode::SUCCESS);
    }

    let config = EngineConfig::default()
        .with_threads(usize::try_from(args.threads).context("thread count out of range")?)
        .with_timeout(args.timeout)
        .with_user_agent(args.user_agent.clone());

    let output_dir = std::env::current_dir().context("cannot determine current directory")?;
    let client = ReqwestClient::new()?;
    let saver = FileSaver::new(output_dir);
    let engine = DownloadEngine::new(config, Arc::new(client), Arc::new(saver))?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    let signal_listener = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping downloads");
            signal_token.cancel();
        }
    });

    info!(links = links.len(), "dwl starting");
    engine.download(&links, &cancel).await;
    signal_listener.abort();

    if cancel.is_cancelled() {
        warn!("Interrupted before all links were downloaded");
        return Ok(ExitCode::from(INTERRUPTED_EXIT_CODE));
    }

    Ok(ExitCode::SUCCESS)
}

/// Installs the tracing subscriber.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > default (info).
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Reads links from piped stdin, one per line.
///
/// Blank lines and lines starting with `#` are skipped. Returns an empty list
/// when stdin is a terminal.
fn read_links_from_stdin() -> Result<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    parse_link_lines(stdin.lock())
}

fn parse_link_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut links = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read links from stdin")?;
        let link = line.trim();
        if link.is_empty() || link.starts_with('#') {
            continue;
        }
        links.push(link.to_string());
    }
    Ok(links)
}
