//! Yotei - Japanese schedule extraction from the command line
//!
//! Reads messages (one per line) from stdin, or a single `--text`, and prints
//! one JSON object per message.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use yotei_infra::config;
use yotei_lib::utils::logging::init_tracing;
use yotei_lib::AppContext;

#[derive(Debug, Parser)]
#[command(name = "yotei", version, about = "Extract schedule slots from Japanese messages")]
struct Cli {
    /// Process this message instead of reading stdin
    #[arg(short, long)]
    text: Option<String>,

    /// Config file (JSON or TOML); environment and standard paths otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let settings = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;
    let context = AppContext::new_with_config(settings).context("failed to build pipeline")?;

    match cli.text.as_deref() {
        Some(text) => emit(&context, text, cli.pretty).await?,
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
                if line.trim().is_empty() {
                    continue;
                }
                emit(&context, &line, cli.pretty).await?;
            }
        }
    }

    context.shutdown();
    Ok(())
}

async fn emit(context: &AppContext, text: &str, pretty: bool) -> anyhow::Result<()> {
    let response = context.process(text).await;
    let rendered = if pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .context("failed to serialize response")?;
    println!("{rendered}");
    Ok(())
}
