//! Per-query result entries

use super::corpus::Record;

/// A scored corpus record returned by a search.
///
/// Borrows the record from the shared corpus; the score exists only here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'c> {
    /// Matched record
    pub record: &'c Record,
    /// Cosine similarity to the query
    pub score: f64,
}

impl<'c> SearchHit<'c> {
    /// Create a new hit
    pub fn new(record: &'c Record, score: f64) -> Self {
        Self { record, score }
    }

    /// Title of the matched record
    pub fn title(&self) -> &'c str {
        &self.record.title
    }
}
