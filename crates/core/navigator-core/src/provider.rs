//! Embedding provider interface

use crate::Result;
use async_trait::async_trait;

/// Remote (or local) model that turns text into a fixed-length vector.
///
/// Implementations report failures as
/// [`NavigatorError::EmbeddingProvider`](crate::NavigatorError::EmbeddingProvider)
/// and mark network-level or rate-limit failures as transient so the
/// searcher can retry them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}
