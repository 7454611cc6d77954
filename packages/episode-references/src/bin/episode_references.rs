//! CLI for extracting references from the latest crawled episode batch.
//!
//! Per-episode extraction failures are reported but never change the exit
//! status; only missing data, unreadable batches and failed writes do.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use episode_references::ai::OpenAIExtractor;
use episode_references::{
    BatchId, Config, DatasetStore, EpisodeStore, JsonFileWriter, Pipeline, RunReport,
};
use openai_client::OpenAIClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "episode-references")]
#[command(about = "Extract bibliographic references from podcast show notes")]
struct Cli {
    /// Dataset directory (overrides DATASET_DIR)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored episode batches
    Batches,

    /// Extract references and write the results file
    Extract {
        /// Batch to process instead of the latest one
        #[arg(long)]
        batch: Option<String>,

        /// Output file (overrides OUTPUT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Chat model (overrides EXTRACTION_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Extraction calls in flight (overrides EXTRACTION_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<NonZeroUsize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,episode_references=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dataset) = cli.dataset {
        config.dataset_dir = dataset;
    }

    match cli.command {
        Commands::Batches => cmd_batches(&config).await,
        Commands::Extract {
            batch,
            output,
            model,
            concurrency,
        } => {
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            cmd_extract(&config, batch.map(BatchId::new)).await
        }
    }
}

async fn cmd_batches(config: &Config) -> Result<()> {
    let store = DatasetStore::new(&config.dataset_dir);
    let batches = store
        .list_batches()
        .await
        .context("Failed to list episode batches")?;

    if batches.is_empty() {
        println!("No batches in {}", store.location());
        return Ok(());
    }

    let latest = batches.len() - 1;
    for (i, id) in batches.iter().enumerate() {
        let marker = if i == latest { "  (latest)" } else { "" };
        println!("{}{}", id, marker);
    }
    Ok(())
}

async fn cmd_extract(config: &Config, batch: Option<BatchId>) -> Result<()> {
    let mut client =
        OpenAIClient::new(config.require_openai_api_key()?).with_timeout(config.request_timeout);
    if let Some(base_url) = &config.openai_base_url {
        client = client.with_base_url(base_url);
    }

    let pipeline = Pipeline::with_config(
        DatasetStore::new(&config.dataset_dir),
        OpenAIExtractor::new(client).with_model(&config.model),
        JsonFileWriter::new(&config.output_path),
        config.pipeline(),
    );

    let report = match batch {
        Some(id) => pipeline.run_batch(&id).await,
        None => pipeline.run().await,
    }
    .map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("Reference extraction failed during {}", stage))
    })?;

    print_summary(&report, config);
    Ok(())
}

fn print_summary(report: &RunReport, config: &Config) {
    println!(
        "Batch {}: {} episodes, {} references, {} failed -> {}",
        report.batch,
        report.results.len(),
        report.reference_count(),
        report.failure_count(),
        config.output_path.display()
    );

    for diagnostic in &report.diagnostics {
        eprintln!("  {}: {}", diagnostic.href, diagnostic.failure);
    }
}
