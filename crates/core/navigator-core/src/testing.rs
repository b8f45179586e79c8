//! Test fakes and fixtures
//!
//! In-process [`EmbeddingProvider`] implementations for exercising the
//! searcher and front ends without a network.

use crate::provider::EmbeddingProvider;
use crate::types::{Corpus, Record};
use crate::{NavigatorError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed vector, optionally overridden per query text
pub struct StaticEmbeddingProvider {
    default: Vec<f64>,
    by_text: HashMap<String, Vec<f64>>,
    calls: AtomicUsize,
}

impl StaticEmbeddingProvider {
    /// Answer every query with `vector`
    pub fn new(vector: Vec<f64>) -> Self {
        Self {
            default: vector,
            by_text: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer `text` with `vector` instead of the default
    pub fn with_query(mut self, text: impl Into<String>, vector: Vec<f64>) -> Self {
        self.by_text.insert(text.into(), vector);
        self
    }

    /// Number of `embed` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbeddingProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn model(&self) -> &str {
        "static-test-model"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .by_text
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

/// Fails every call
pub struct FailingEmbeddingProvider {
    message: String,
    transient: bool,
    calls: AtomicUsize,
}

impl FailingEmbeddingProvider {
    /// Permanent failures (not retried)
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Transient failures (retried until exhaustion)
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-test-model"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(NavigatorError::EmbeddingProvider {
            provider: self.name().to_string(),
            message: self.message.clone(),
            transient: self.transient,
        })
    }
}

/// Fails transiently a set number of times, then succeeds
pub struct FlakyEmbeddingProvider {
    failures_left: AtomicUsize,
    vector: Vec<f64>,
    calls: AtomicUsize,
}

impl FlakyEmbeddingProvider {
    /// Fail `failures` times before returning `vector`
    pub fn new(failures: usize, vector: Vec<f64>) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            vector,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbeddingProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    fn model(&self) -> &str {
        "flaky-test-model"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let took_failure = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if took_failure {
            return Err(NavigatorError::provider_transient(
                self.name(),
                "connection reset",
            ));
        }
        Ok(self.vector.clone())
    }
}

/// Record with a generated body and URL
pub fn record(title: &str, embedding: Vec<f64>) -> Record {
    let slug = title.to_lowercase().replace(' ', "-");
    Record::new(
        title,
        format!("{title} body. Second sentence. Third sentence. Fourth sentence."),
        embedding,
        format!("https://memos.example.org/{slug}"),
    )
}

/// Corpus built from `(title, embedding)` pairs
pub fn corpus_from(entries: &[(&str, Vec<f64>)]) -> Corpus {
    Corpus::new(
        entries
            .iter()
            .map(|(title, embedding)| record(title, embedding.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_overrides() {
        let provider =
            StaticEmbeddingProvider::new(vec![1.0, 0.0]).with_query("b", vec![0.0, 1.0]);
        assert_eq!(provider.embed("a").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(provider.embed("b").await.unwrap(), vec![0.0, 1.0]);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_flaky_provider_recovers() {
        let provider = FlakyEmbeddingProvider::new(1, vec![1.0]);
        assert!(provider.embed("q").await.unwrap_err().is_transient());
        assert_eq!(provider.embed("q").await.unwrap(), vec![1.0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_flaky_provider_concurrent_calls_share_failures() {
        let provider = std::sync::Arc::new(FlakyEmbeddingProvider::new(3, vec![1.0]));
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let provider = std::sync::Arc::clone(&provider);
                tokio::spawn(async move { provider.embed("q").await.is_err() })
            })
            .collect();

        let mut failures = 0;
        for task in tasks {
            if task.await.unwrap() {
                failures += 1;
            }
        }
        assert_eq!(failures, 3);
        assert_eq!(provider.calls(), 16);
    }

    #[test]
    fn test_fixtures() {
        let corpus = corpus_from(&[("Science Infrastructure", vec![1.0])]);
        assert_eq!(
            corpus.records()[0].url,
            "https://memos.example.org/science-infrastructure"
        );
    }
}
