//! Configuration management and environment variable loading

use crate::resilience::RetryConfig;
use crate::search::SearchConfig;
use crate::{NavigatorError, Result};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the pre-embedded memo table
pub const DEFAULT_CORPUS_PATH: &str = "data/preembedded_memos.csv";

/// Read settings from a `.env` file in the working directory or a parent.
///
/// Returns the file that was applied, or `None` when there is none. Runs
/// before logging is set up (the file may set `RUST_LOG`), so the caller
/// reports the path.
///
/// # Example
///
/// ```no_run
/// use navigator_core::{init_logging, load_env};
///
/// let dotenv = load_env().ok().flatten();
/// init_logging();
/// if let Some(path) = dotenv {
///     tracing::info!("Settings read from {}", path.display());
/// }
/// ```
pub fn load_env() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) => dotenv_outcome(e).map(|()| None),
    }
}

/// Read settings from a specific `.env`-format file.
///
/// A missing file yields `Ok(None)`; a malformed one is a config error.
pub fn load_env_from(path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) => dotenv_outcome(e).map(|()| None),
    }
}

fn dotenv_outcome(err: dotenvy::Error) -> Result<()> {
    match err {
        dotenvy::Error::Io(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        dotenvy::Error::LineParse(line, pos) => Err(NavigatorError::config(format!(
            "Malformed settings line in .env at column {}: {}",
            pos, line
        ))),
        other => Err(NavigatorError::config(format!(
            "Could not read .env settings: {}",
            other
        ))),
    }
}

/// Non-blank value of `key`; blank values count as unset
fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Value of `key`, which must be set and non-blank
pub fn get_required_env(key: &str) -> Result<String> {
    env_value(key).ok_or_else(|| {
        NavigatorError::config(format!(
            "{} must be set in .env or the process environment",
            key
        ))
    })
}

/// Value of `key`, or `default` when unset or blank
pub fn get_env_or(key: &str, default: &str) -> String {
    env_value(key).unwrap_or_else(|| default.to_string())
}

/// Value of `key` parsed as `T`, or `default` when unset or unparseable
///
/// An unparseable value is logged and ignored.
pub fn get_env_parsed<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    let Some(raw) = env_value(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value, using the default", key, raw);
            default
        }
    }
}

/// Settings shared by every front end
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Corpus CSV location
    pub corpus_path: PathBuf,
    /// Results per query
    pub top_k: usize,
    /// Deadline for one embedding attempt
    pub request_timeout: Duration,
    /// Retries after a transient embedding failure
    pub max_retries: usize,
    /// First retry delay
    pub retry_initial_delay: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            top_k: search.default_top_k,
            request_timeout: search.request_timeout,
            max_retries: search.retry.max_retries,
            retry_initial_delay: search.retry.initial_delay,
        }
    }
}

impl NavigatorConfig {
    /// Read settings from `NAVIGATOR_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            corpus_path: PathBuf::from(get_env_or("NAVIGATOR_CORPUS_PATH", DEFAULT_CORPUS_PATH)),
            top_k: get_env_parsed("NAVIGATOR_TOP_K", defaults.top_k),
            request_timeout: Duration::from_secs(get_env_parsed(
                "NAVIGATOR_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            max_retries: get_env_parsed("NAVIGATOR_MAX_RETRIES", defaults.max_retries),
            retry_initial_delay: Duration::from_millis(get_env_parsed(
                "NAVIGATOR_RETRY_INITIAL_DELAY_MS",
                defaults.retry_initial_delay.as_millis() as u64,
            )),
        }
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(NavigatorError::config("request timeout must be non-zero"));
        }
        Ok(())
    }

    /// Searcher configuration derived from these settings
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            default_top_k: self.top_k,
            request_timeout: self.request_timeout,
            retry: RetryConfig {
                max_retries: self.max_retries,
                initial_delay: self.retry_initial_delay,
                ..RetryConfig::default()
            },
        }
    }
}
