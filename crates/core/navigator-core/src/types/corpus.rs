//! Memo records and the in-memory corpus

use serde::{Deserialize, Serialize};

/// One memo with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Memo title
    pub title: String,
    /// Full memo text
    pub body_text: String,
    /// Precomputed embedding vector
    pub embedding: Vec<f64>,
    /// Link to the full memo
    pub url: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        title: impl Into<String>,
        body_text: impl Into<String>,
        embedding: Vec<f64>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body_text: body_text.into(),
            embedding,
            url: url.into(),
        }
    }

    /// Embedding length
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Aggregate counts gathered while loading a corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Data rows seen in the source file
    pub total_rows: usize,
    /// Rows dropped because the record or its embedding could not be parsed
    pub dropped_rows: usize,
    /// Embedding length of the first kept record
    pub dimension: Option<usize>,
    /// Kept records whose embedding length differs from `dimension`
    pub mismatched_dimensions: usize,
}

impl LoadStats {
    /// Rows that made it into the corpus
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.dropped_rows
    }
}

/// Immutable, ordered collection of records
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    stats: LoadStats,
}

impl Corpus {
    /// Build a corpus from already-validated records
    pub fn new(records: Vec<Record>) -> Self {
        let dimension = records.first().map(Record::dimension);
        let mismatched_dimensions = match dimension {
            Some(dim) => records.iter().filter(|r| r.dimension() != dim).count(),
            None => 0,
        };
        let stats = LoadStats {
            total_rows: records.len(),
            dropped_rows: 0,
            dimension,
            mismatched_dimensions,
        };
        Self { records, stats }
    }

    /// Build a corpus and record how many source rows were discarded
    pub fn with_dropped(records: Vec<Record>, dropped_rows: usize) -> Self {
        let mut corpus = Self::new(records);
        corpus.stats.total_rows += dropped_rows;
        corpus.stats.dropped_rows = dropped_rows;
        corpus
    }

    /// Records in load order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate records in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Get a record by position
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load statistics
    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
