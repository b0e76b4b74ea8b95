// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad CLI entrypoint.
//!
//! By default this serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations), and
//! `--transcript <file|->` to feed newline-delimited JSON utterances into the queue.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use naiad::canvas::{CanvasSurface, MemoryCanvas};
use naiad::config::Config;
use naiad::generate::{GenerationService, HeuristicGenerationService, HttpGenerationService};
use naiad::mcp::NaiadMcp;
use naiad::model::{SessionIdentity, Utterance};
use naiad::queue::{EnqueueOutcome, GenerationQueue};

const DEFAULT_MCP_HTTP_PORT: u16 = 27435;

#[derive(Debug, Parser)]
#[command(name = "naiad", version, about = "Transcript-driven diagram generation queue")]
struct Cli {
    /// JSON configuration file; every field is optional.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serve MCP over stdio instead of streamable HTTP.
    #[arg(long, conflicts_with = "mcp_http_port")]
    mcp: bool,

    /// Port for the streamable HTTP transport (0 = ephemeral).
    #[arg(long, value_name = "PORT")]
    mcp_http_port: Option<u16>,

    /// Streaming generation endpoint; overrides `generation.endpoint`.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Concurrent generations; overrides `generation.concurrency`.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: Option<u16>,

    /// Newline-delimited JSON utterances to enqueue (`-` reads stdin).
    #[arg(long, value_name = "FILE")]
    transcript: Option<PathBuf>,
}

impl Cli {
    fn reads_stdin(&self) -> bool {
        self.transcript.as_deref().is_some_and(|path| path.as_os_str() == "-")
    }

    fn resolve_config(&self) -> Result<Config, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.generation.endpoint = Some(endpoint.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.generation.concurrency = usize::from(concurrency);
        }
        config.validate()?;
        Ok(config)
    }
}

fn generation_service(config: &Config) -> Arc<dyn GenerationService> {
    match &config.generation.endpoint {
        Some(endpoint) => {
            tracing::info!(%endpoint, "using streaming generation endpoint");
            Arc::new(HttpGenerationService::new(endpoint.clone()))
        }
        None => {
            tracing::info!("no generation endpoint configured; using heuristic extractor");
            Arc::new(HeuristicGenerationService::new())
        }
    }
}

async fn feed_lines<R>(queue: GenerationQueue, reader: R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let utterance: Utterance = match serde_json::from_str(&line) {
            Ok(utterance) => utterance,
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "skipping malformed utterance");
                continue;
            }
        };
        match queue.enqueue(utterance).await {
            Ok(EnqueueOutcome::Accepted(id)) => tracing::debug!(%id, "utterance accepted"),
            Ok(EnqueueOutcome::Duplicate(id)) => tracing::debug!(%id, "duplicate utterance"),
            Ok(EnqueueOutcome::Skipped { words }) => {
                tracing::debug!(line = line_no, words, "utterance too short")
            }
            Err(err) => tracing::warn!(line = line_no, error = %err, "enqueue failed"),
        }
    }
    tracing::info!(lines = line_no, "transcript finished");
    Ok(())
}

async fn feed_transcript(queue: GenerationQueue, path: PathBuf) {
    let result = if path.as_os_str() == "-" {
        feed_lines(queue, BufReader::new(tokio::io::stdin())).await
    } else {
        match tokio::fs::File::open(&path).await {
            Ok(file) => feed_lines(queue, BufReader::new(file)).await,
            Err(err) => Err(err),
        }
    };
    if let Err(err) = result {
        tracing::error!(path = %path.display(), error = %err, "transcript feed failed");
    }
}

async fn serve_http(mcp: NaiadMcp, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let config =
        StreamableHttpServerConfig { stateful_mode: true, ..StreamableHttpServerConfig::default() };
    let shutdown_token = config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

    let router = Router::new().nest_service("/mcp", mcp_service);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_token.cancelled() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received; shutting down");
                    shutdown_token.cancel();
                }
            }
        })
        .await?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.resolve_config()?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async move {
        let canvas: Arc<dyn CanvasSurface> = Arc::new(MemoryCanvas::new());
        let session = SessionIdentity::generate(config.session.name.clone());
        tracing::info!(session = %session.id, name = %session.name, "session started");

        let queue = GenerationQueue::new(
            generation_service(&config),
            canvas,
            session,
            config.queue_config(),
        );
        if let Some(path) = cli.transcript.clone() {
            tokio::spawn(feed_transcript(queue.clone(), path));
        }

        let mcp = NaiadMcp::new(queue);
        if cli.mcp {
            mcp.serve_stdio().await?;
        } else {
            serve_http(mcp, cli.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT)).await?;
        }
        Ok::<(), Box<dyn Error>>(())
    })
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    if cli.mcp && cli.reads_stdin() {
        eprintln!("naiad: --transcript - cannot be combined with --mcp (stdin carries MCP)");
        std::process::exit(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("naiad=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("naiad: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_empty_args() {
        let cli = Cli::try_parse_from(["naiad"]).expect("parse");
        assert!(!cli.mcp);
        assert_eq!(cli.mcp_http_port, None);
        assert!(cli.transcript.is_none());
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.generation.concurrency, 1);
        assert_eq!(config.generation.endpoint, None);
    }

    #[test]
    fn flags_override_config_values() {
        let cli = Cli::try_parse_from([
            "naiad",
            "--endpoint",
            "http://127.0.0.1:9000/generate",
            "--concurrency",
            "3",
        ])
        .expect("parse");
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.generation.endpoint.as_deref(), Some("http://127.0.0.1:9000/generate"));
        assert_eq!(config.generation.concurrency, 3);
    }

    #[test]
    fn rejects_mcp_http_port_with_stdio_mcp_mode() {
        Cli::try_parse_from(["naiad", "--mcp", "--mcp-http-port", "0"]).unwrap_err();
    }

    #[test]
    fn rejects_zero_concurrency() {
        Cli::try_parse_from(["naiad", "--concurrency", "0"]).unwrap_err();
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let cli = Cli::try_parse_from(["naiad", "--endpoint", "ftp://nope"]).expect("parse");
        cli.resolve_config().unwrap_err();
    }

    #[test]
    fn detects_stdin_transcript() {
        let cli = Cli::try_parse_from(["naiad", "--transcript", "-"]).expect("parse");
        assert!(cli.reads_stdin());
        let cli = Cli::try_parse_from(["naiad", "--transcript", "talk.ndjson"]).expect("parse");
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn rejects_unknown_args() {
        Cli::try_parse_from(["naiad", "--nope"]).unwrap_err();
    }
}
