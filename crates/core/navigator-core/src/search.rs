//! Similarity search
//!
//! Embeds the query through an [`EmbeddingProvider`], scores every corpus
//! record by cosine similarity and returns the best matches.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::provider::EmbeddingProvider;
use crate::resilience::{retry_with_backoff, with_timeout, RetryConfig};
use crate::types::{Corpus, SearchHit};
use crate::{NavigatorError, Result};

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Results returned by [`Searcher::search_default`] (default: 50)
    pub default_top_k: usize,
    /// Deadline for each embedding attempt (default: 30s)
    pub request_timeout: Duration,
    /// Retry policy for transient provider failures
    pub retry: RetryConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: 50,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

/// Cosine similarity of two vectors.
///
/// `None` when the lengths differ, either norm is zero, or the result is not
/// finite.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let score = dot / (norm_a * norm_b);
    score.is_finite().then_some(score)
}

/// Score every record against `query` and keep the `top_k` best.
///
/// Records without a defined score are skipped. Equal scores keep corpus
/// order.
pub fn rank<'c>(corpus: &'c Corpus, query: &[f64], top_k: usize) -> Vec<SearchHit<'c>> {
    let mut mismatched = 0usize;
    let mut hits: Vec<SearchHit<'c>> = corpus
        .iter()
        .filter_map(|record| {
            if record.embedding.len() != query.len() {
                mismatched += 1;
                return None;
            }
            cosine_similarity(&record.embedding, query).map(|score| SearchHit::new(record, score))
        })
        .collect();

    if mismatched > 0 {
        debug!(
            "Skipped {} records whose embedding length differs from the query ({})",
            mismatched,
            query.len()
        );
    }

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top_k);
    hits
}

/// Runs queries against a corpus using one embedding provider
pub struct Searcher {
    provider: Arc<dyn EmbeddingProvider>,
    config: SearchConfig,
}

impl Searcher {
    /// Create a searcher with an explicit provider and configuration
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Embed the query text, retrying transient failures
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f64>> {
        let provider = &self.provider;
        let limit = self.config.request_timeout;

        let vector = retry_with_backoff(&self.config.retry, || {
            with_timeout(limit, "embedding request", provider.embed(query))
        })
        .await?;

        if vector.is_empty() {
            return Err(NavigatorError::provider(
                provider.name(),
                "provider returned an empty embedding",
            ));
        }
        Ok(vector)
    }

    /// Return up to `top_k` records most similar to `query`.
    ///
    /// Provider failures are returned as errors, never as an empty list.
    pub async fn search<'c>(
        &self,
        corpus: &'c Corpus,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit<'c>>> {
        let query_vector = self.embed_query(query).await?;
        let hits = rank(corpus, &query_vector, top_k);

        info!(
            "Query matched {} of {} records (top_k = {})",
            hits.len(),
            corpus.len(),
            top_k
        );
        Ok(hits)
    }

    /// Search with the configured default `top_k`
    pub async fn search_default<'c>(
        &self,
        corpus: &'c Corpus,
        query: &str,
    ) -> Result<Vec<SearchHit<'c>>> {
        self.search(corpus, query, self.config.default_top_k).await
    }
}
