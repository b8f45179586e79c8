//! Terminal front end for memo search
//!
//! Renders ranked memos as plain text and drives the one-shot and
//! interactive query modes of the `navigator` binary.

use navigator_core::{Corpus, SearchHit, Searcher};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Sentences of `body_text` shown under each title
pub const PREVIEW_SENTENCES: usize = 3;

const SEPARATOR: &str = "---";
const PROMPT: &str = "> ";

/// First `sentences` `". "`-separated sentences of `body`, followed by `...`
pub fn preview(body: &str, sentences: usize) -> String {
    let head: Vec<&str> = body.split(". ").take(sentences).collect();
    format!("{}...", head.join(". "))
}

/// Write one block per hit in rank order
pub fn render_hits<W: Write>(out: &mut W, hits: &[SearchHit<'_>]) -> io::Result<()> {
    for hit in hits {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "{}", hit.record.title)?;
        writeln!(out, "{}", preview(&hit.record.body_text, PREVIEW_SENTENCES))?;
        writeln!(out, "Similarity: {:.3}", hit.score)?;
        writeln!(out, "{}", hit.record.url)?;
    }
    Ok(())
}

/// What a single query produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// This many hits were printed
    Hits(usize),
    /// The search succeeded but nothing was scoreable
    NoResults,
    /// The query could not be embedded
    Failed,
}

/// Runs queries against one loaded corpus
pub struct TerminalAdaptor {
    searcher: Searcher,
    corpus: Arc<Corpus>,
}

impl TerminalAdaptor {
    pub fn new(searcher: Searcher, corpus: Arc<Corpus>) -> Self {
        Self { searcher, corpus }
    }

    /// Search once and print the outcome
    ///
    /// Only write errors are returned; a failed search is reported on `out`.
    pub async fn run_query<W: Write>(&self, query: &str, out: &mut W) -> io::Result<QueryOutcome> {
        match self.searcher.search_default(&self.corpus, query).await {
            Ok(hits) if hits.is_empty() => {
                writeln!(out, "No results for \"{}\"", query)?;
                Ok(QueryOutcome::NoResults)
            }
            Ok(hits) => {
                render_hits(out, &hits)?;
                Ok(QueryOutcome::Hits(hits.len()))
            }
            Err(e) => {
                tracing::error!("Search failed for \"{}\": {}", query, e);
                writeln!(out, "Search failed: {}", e)?;
                Ok(QueryOutcome::Failed)
            }
        }
    }

    /// Read queries line by line until EOF, `:q` or `quit`
    ///
    /// Returns the number of queries run.
    pub async fn run_interactive<R, W>(&self, input: R, out: &mut W) -> io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut queries = 0;

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let query = line.trim();
            match query {
                "" => continue,
                ":q" | "quit" => break,
                _ => {
                    self.run_query(query, out).await?;
                    queries += 1;
                }
            }
        }

        writeln!(out)?;
        Ok(queries)
    }
}
