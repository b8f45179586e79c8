//! Policy Navigator - semantic search over pre-embedded policy memos
//!
//! Usage:
//! ```bash
//! # One query, then exit:
//! navigator --query "science infrastructure" --top-k 10
//!
//! # Interactive prompt (":q" or EOF to leave):
//! navigator --corpus data/preembedded_memos.csv
//! ```

use anyhow::Context;
use clap::Parser;
use navigator_adaptor_terminal::{QueryOutcome, TerminalAdaptor};
use navigator_core::{init_logging, load_env, CorpusCache, NavigatorConfig, Searcher};
use navigator_provider_openai::{OpenAIEmbeddingConfig, OpenAIEmbeddingProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "navigator")]
#[command(version, about = "Semantic search over pre-embedded policy memos")]
struct Cli {
    /// Corpus CSV (overrides NAVIGATOR_CORPUS_PATH)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Number of memos to show (overrides NAVIGATOR_TOP_K)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Embedding model (overrides NAVIGATOR_EMBEDDING_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Run a single query instead of the interactive prompt
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may set RUST_LOG, so it is read before the subscriber is installed
    let dotenv = load_env()?;
    init_logging();
    match dotenv {
        Some(path) => tracing::info!("Read settings from {}", path.display()),
        None => tracing::debug!("No .env file found, using the process environment"),
    }

    let cli = Cli::parse();

    let mut config = NavigatorConfig::from_env();
    if let Some(path) = cli.corpus {
        config.corpus_path = path;
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    config.validate()?;

    let cache = CorpusCache::new(&config.corpus_path);
    let corpus = cache.get_or_load().with_context(|| {
        format!("failed to load corpus from {}", config.corpus_path.display())
    })?;

    let mut provider_config =
        OpenAIEmbeddingConfig::from_env()?.with_timeout(config.request_timeout);
    if let Some(model) = cli.model {
        provider_config = provider_config.with_model(model);
    }
    let provider = OpenAIEmbeddingProvider::new(provider_config)
        .context("failed to create embedding provider")?;

    tracing::info!("Ready: {} memos, top_k = {}", corpus.len(), config.top_k);

    let adaptor = TerminalAdaptor::new(
        Searcher::new(Arc::new(provider), config.search_config()),
        corpus,
    );
    let mut out = std::io::stdout();

    match cli.query {
        Some(query) => {
            if adaptor.run_query(&query, &mut out).await? == QueryOutcome::Failed {
                std::process::exit(1);
            }
        }
        None => {
            adaptor
                .run_interactive(BufReader::new(tokio::io::stdin()), &mut out)
                .await?;
        }
    }

    Ok(())
}
