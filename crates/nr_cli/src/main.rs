use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use nr_core::{DocumentStore, EmbeddingProvider};
use nr_embed::{DummyEmbedder, OpenAiEmbedder};
use nr_ingest::{sources, Pipeline, PipelineConfig};
use nr_storage::{FsStore, MemoryStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nr", about = "News ingestion and embedding pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StorageKind {
    /// Keep articles in memory (lost on exit)
    Memory,
    /// One JSON blob per article under the data directory
    Fs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline once over the configured sources
    Run {
        /// JSON file with the source list; defaults to the built-in feeds
        #[arg(long)]
        sources: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "fs")]
        storage: StorageKind,

        /// Root directory for the fs backend
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Use the deterministic offline embedder instead of OpenAI
        #[arg(long)]
        dummy_embeddings: bool,

        /// Minimum extracted content length, in characters
        #[arg(long, default_value_t = 100)]
        content_threshold: usize,

        /// Token budget per embedding call
        #[arg(long, default_value_t = 1024)]
        max_tokens: usize,

        /// Politeness delay before each page fetch, in milliseconds
        #[arg(long, default_value_t = 500)]
        fetch_delay_ms: u64,

        /// Attempts per message before dead-lettering
        #[arg(long, default_value_t = 3)]
        max_attempts: u32,
    },
    /// List the configured sources
    Sources {
        #[arg(long)]
        sources: Option<PathBuf>,
    },
}

async fn load(sources_path: Option<&PathBuf>) -> anyhow::Result<Vec<nr_core::Source>> {
    match sources_path {
        Some(path) => sources::load_sources(path)
            .await
            .with_context(|| format!("failed to load sources from {}", path.display())),
        None => Ok(sources::default_sources()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            sources: sources_path,
            storage,
            data_dir,
            dummy_embeddings,
            content_threshold,
            max_tokens,
            fetch_delay_ms,
            max_attempts,
        } => {
            let source_list = load(sources_path.as_ref()).await?;

            let store: Arc<dyn DocumentStore> = match storage {
                StorageKind::Memory => Arc::new(MemoryStore::new()),
                StorageKind::Fs => Arc::new(FsStore::new(data_dir)),
            };

            let provider: Arc<dyn EmbeddingProvider> = if dummy_embeddings {
                Arc::new(DummyEmbedder::default())
            } else {
                Arc::new(OpenAiEmbedder::new(std::env::var("OPENAI_API_KEY").ok())?)
            };
            info!(provider = provider.name(), dimensions = provider.dimensions(), "embedding provider ready");

            let config = PipelineConfig {
                content_threshold,
                max_tokens,
                fetch_delay: Duration::from_millis(fetch_delay_ms),
                max_attempts,
                ..PipelineConfig::default()
            };

            let pipeline = Pipeline::new(store, provider, config)?;
            let summary = pipeline.run(source_list).await?;

            println!(
                "dispatched {} sources, queued {} items: {} embedded, {} skipped, {} unchanged, {} dropped",
                summary.dispatched,
                summary.queued,
                summary.embedded,
                summary.skipped,
                summary.unchanged,
                summary.dropped
            );
            for dead in &summary.dead_letters {
                eprintln!(
                    "dead-letter [{}] after {} attempts: {}",
                    dead.queue, dead.attempts, dead.error
                );
            }
            if !summary.dead_letters.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Sources { sources: sources_path } => {
            for source in load(sources_path.as_ref()).await? {
                let active = if source.is_active() { "" } else { " (inactive)" };
                println!("{:<16} {}{}", source.id, source.url, active);
            }
        }
    }
    Ok(())
}
