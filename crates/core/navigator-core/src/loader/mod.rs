/*!
# Corpus Loader

Reads the pre-embedded memo table into an in-memory [`Corpus`].

Row-level problems (malformed CSV records, unparseable embeddings) drop the
row and are only visible through [`LoadStats`](crate::types::LoadStats).
File-level problems are returned as errors.
*/

pub mod embedding;
pub mod encoding;

pub use embedding::{parse_embedding, ParsedEmbedding};
pub use encoding::{decode_dropping_invalid, repair_text};

use crate::types::{Corpus, Record};
use crate::{NavigatorError, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Columns every corpus file must have
pub const REQUIRED_COLUMNS: [&str; 3] = ["title", "body_text", "Embedding"];

/// One CSV row before validation
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body_text: Option<String>,
    #[serde(rename = "Embedding", default)]
    embedding: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Load a corpus from a CSV file
pub fn load(path: impl AsRef<Path>) -> Result<Corpus> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| NavigatorError::load_io(path, e))?;
    let corpus = parse_corpus(&bytes)?;

    let stats = corpus.stats();
    info!(
        "Loaded corpus from {}: {} records ({} rows dropped)",
        path.display(),
        corpus.len(),
        stats.dropped_rows
    );
    if stats.mismatched_dimensions > 0 {
        warn!(
            "{} records have an embedding length other than {:?}",
            stats.mismatched_dimensions, stats.dimension
        );
    }

    Ok(corpus)
}

/// Parse corpus CSV content already in memory
pub fn parse_corpus(bytes: &[u8]) -> Result<Corpus> {
    let text = decode_dropping_invalid(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| NavigatorError::format(format!("unreadable header row: {e}")))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        return Err(NavigatorError::format(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }
    let headers = csv::StringRecord::from(headers.iter().map(str::trim).collect::<Vec<_>>());

    let mut records = Vec::new();
    let mut dropped = 0;

    for (index, result) in reader.records().enumerate() {
        let row_number = index + 2;
        let raw: RawRow = match result.and_then(|r| r.deserialize(Some(&headers))) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Dropping row {}: {}", row_number, e);
                dropped += 1;
                continue;
            }
        };

        match row_to_record(raw) {
            Some(record) => records.push(record),
            None => {
                debug!("Dropping row {}: embedding is not a list of numbers", row_number);
                dropped += 1;
            }
        }
    }

    Ok(Corpus::with_dropped(records, dropped))
}

fn row_to_record(raw: RawRow) -> Option<Record> {
    let embedding = parse_embedding(raw.embedding.as_deref().unwrap_or_default()).into_vector()?;

    Some(Record {
        title: repair_text(raw.title.as_deref().unwrap_or_default()),
        body_text: repair_text(raw.body_text.as_deref().unwrap_or_default()),
        embedding,
        url: raw.url.unwrap_or_default(),
    })
}

/// Loads a corpus on first use and keeps it for the life of the process
pub struct CorpusCache {
    path: PathBuf,
    cell: OnceCell<Arc<Corpus>>,
}

impl CorpusCache {
    /// Create a cache for the corpus at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the corpus has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the cached corpus, loading it first if needed.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(&self) -> Result<Arc<Corpus>> {
        self.cell
            .get_or_try_init(|| load(&self.path).map(Arc::new))
            .cloned()
    }
}
