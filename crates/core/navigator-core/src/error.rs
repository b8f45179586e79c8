//! Error types for Policy Navigator core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Policy Navigator operations
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Corpus file missing or unreadable
    #[error("Failed to read corpus '{}': {source}", path.display())]
    LoadIo {
        /// Path that was being loaded
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Corpus file readable but not a usable table (no header, missing columns)
    #[error("Corpus format error: {0}")]
    Format(String),

    /// Embedding provider call failed
    #[error("Embedding provider '{provider}' failed: {message}")]
    EmbeddingProvider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
        /// Whether retrying the same request may succeed
        transient: bool,
    },

    /// A single provider attempt exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Every retry attempt for a transient failure was used up
    #[error("Embedding request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: usize,
        /// Error returned by the final attempt
        last_error: Box<NavigatorError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient Result type using NavigatorError
pub type Result<T> = std::result::Result<T, NavigatorError>;

impl NavigatorError {
    /// Create a load IO error
    pub fn load_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NavigatorError::LoadIo {
            path: path.into(),
            source,
        }
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        NavigatorError::Format(msg.into())
    }

    /// Create a permanent provider error
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        NavigatorError::EmbeddingProvider {
            provider: provider.into(),
            message: msg.into(),
            transient: false,
        }
    }

    /// Create a provider error that is worth retrying
    pub fn provider_transient(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        NavigatorError::EmbeddingProvider {
            provider: provider.into(),
            message: msg.into(),
            transient: true,
        }
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        NavigatorError::Timeout(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        NavigatorError::Config(msg.into())
    }

    /// Whether a retry of the same operation may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            NavigatorError::EmbeddingProvider { transient, .. } => *transient,
            NavigatorError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Whether this error came from the query embedding call.
    ///
    /// Callers use this to show a "search failed" state instead of an empty
    /// result list.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            NavigatorError::EmbeddingProvider { .. }
                | NavigatorError::Timeout(_)
                | NavigatorError::RetriesExhausted { .. }
        )
    }
}
