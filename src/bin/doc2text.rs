//! CLI binary for doc2text.
//!
//! A thin shim over the library crate. Two ways to run it:
//!
//! * `doc2text report.pdf` — process one document, print the flattened
//!   text, exit.
//! * `doc2text --serve` — tool-host mode: read newline-delimited JSON
//!   requests (`{"filepath": "…"}`) on stdin, write one JSON response
//!   (`{"text": "…"}`) per line on stdout. Per the boundary contract a
//!   response is produced for every request, errors included.
//!
//! Configuration comes from the environment and is validated before the
//! first request is read, so a misconfigured deployment fails at startup
//! rather than on first use.

use anyhow::{bail, Context, Result};
use clap::Parser;
use doc2text::{
    get_processed_document, ObjectStore, PlatformClient, ProcessingMode, ProcessorConfig, S3Store,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "doc2text",
    version,
    about = "Flatten a document into HTML-tagged text via a remote partitioning platform"
)]
struct Cli {
    /// Path of the document to process (omit with --serve).
    file: Option<String>,

    /// Run as a tool server: NDJSON requests on stdin, responses on stdout.
    #[arg(long)]
    serve: bool,
}

#[derive(Deserialize)]
struct ToolRequest {
    filepath: String,
}

#[derive(Serialize)]
struct ToolResponse<'a> {
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so --serve keeps stdout purely for responses.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ProcessorConfig::from_env().context("configuration error")?;
    let platform = PlatformClient::from_config(&config).context("platform client error")?;
    let store: Option<Box<dyn ObjectStore>> = match config.mode {
        ProcessingMode::Workflow => Some(Box::new(S3Store::from_config(&config).await)),
        ProcessingMode::Sync => None,
    };
    let store = store.as_deref();

    if cli.serve {
        serve(&config, &platform, store).await
    } else {
        let Some(file) = cli.file else {
            bail!("either pass a file path or use --serve");
        };
        let text = get_processed_document(&file, &config, &platform, store).await;
        println!("{text}");
        Ok(())
    }
}

/// Tool-host loop: one JSON request per line in, one JSON response per
/// line out. Runs until stdin closes.
async fn serve(
    config: &ProcessorConfig,
    platform: &PlatformClient,
    store: Option<&dyn ObjectStore>,
) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let text = match serde_json::from_str::<ToolRequest>(&line) {
            Ok(req) => get_processed_document(&req.filepath, config, platform, store).await,
            Err(e) => format!("Invalid request: {e}"),
        };

        let response = serde_json::to_string(&ToolResponse { text: &text })?;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
