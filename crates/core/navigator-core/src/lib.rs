//! Policy Navigator Core
//!
//! Semantic search over a fixed corpus of pre-embedded policy memos. This
//! crate provides:
//!
//! - Corpus loading from CSV with mojibake repair and embedding parsing
//! - The [`EmbeddingProvider`] interface for query embeddings
//! - Cosine-similarity ranking and the [`Searcher`] with timeouts and retries
//! - Environment-based configuration and logging setup
//!
//! # Example
//!
//! ```no_run
//! use navigator_core::*;
//! use std::sync::Arc;
//!
//! # async fn run(provider: Arc<dyn EmbeddingProvider>) -> Result<()> {
//! let corpus = load("data/preembedded_memos.csv")?;
//! let searcher = Searcher::new(provider, SearchConfig::default());
//!
//! for hit in searcher.search(&corpus, "science infrastructure", 5).await? {
//!     println!("{:.3} {}", hit.score, hit.record.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod loader;
pub mod provider;
pub mod resilience;
pub mod search;
pub mod testing;
pub mod types;
pub mod utils;

pub use config::{
    get_env_or, get_env_parsed, get_required_env, load_env, load_env_from, NavigatorConfig,
    DEFAULT_CORPUS_PATH,
};
pub use error::{NavigatorError, Result};
pub use loader::{
    load, parse_corpus, parse_embedding, repair_text, CorpusCache, ParsedEmbedding,
    REQUIRED_COLUMNS,
};
pub use provider::EmbeddingProvider;
pub use resilience::{retry_with_backoff, with_timeout, RetryConfig};
pub use search::{cosine_similarity, rank, SearchConfig, Searcher};
pub use types::{Corpus, LoadStats, Record, SearchHit};
pub use utils::init_logging;
