//! End-to-end tests: CSV on disk -> corpus -> searcher with fake providers

use navigator_core::testing::{
    corpus_from, FailingEmbeddingProvider, FlakyEmbeddingProvider, StaticEmbeddingProvider,
};
use navigator_core::*;
use std::sync::Arc;
use std::time::Duration;

fn fast_config(top_k: usize) -> SearchConfig {
    SearchConfig {
        default_top_k: top_k,
        request_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
        },
    }
}

fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preembedded_memos.csv");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

const MEMOS: &str = "\
title,body_text,Embedding,url,agency
A,Memo A. Details.,\"[1, 0]\",https://memos.example.org/a,NIH
B,Memo B. Details.,\"[0, 1]\",https://memos.example.org/b,DOE
Unparseable,Memo X.,\"[1, 'x']\",https://memos.example.org/x,NSF
C,Memo C. Details.,\"[1.0, 0.0]\",https://memos.example.org/c,NASA
Zero,Memo Z.,\"[0.0, 0.0]\",https://memos.example.org/z,NIH
Wide,Memo W.,\"[1, 0, 0]\",https://memos.example.org/w,DOE
";

#[tokio::test]
async fn test_two_best_of_three_with_stable_ties() {
    let (_dir, path) = write_csv(MEMOS);
    let corpus = load(&path).unwrap();
    assert_eq!(corpus.len(), 5);
    assert_eq!(corpus.stats().dropped_rows, 1);

    let provider = Arc::new(StaticEmbeddingProvider::new(vec![1.0, 0.0]));
    let searcher = Searcher::new(provider.clone(), fast_config(50));

    let hits = searcher.search(&corpus, "science funding", 2).await.unwrap();
    let found: Vec<(&str, f64)> = hits.iter().map(|h| (h.title(), h.score)).collect();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].0, "A");
    assert_eq!(found[1].0, "C");
    assert!((found[0].1 - 1.0).abs() < 1e-12);
    assert!((found[1].1 - 1.0).abs() < 1e-12);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_zero_and_mismatched_records_never_returned() {
    let (_dir, path) = write_csv(MEMOS);
    let corpus = load(&path).unwrap();

    let searcher = Searcher::new(
        Arc::new(StaticEmbeddingProvider::new(vec![0.3, 0.7])),
        fast_config(50),
    );
    let hits = searcher.search_default(&corpus, "anything").await.unwrap();
    let titles: Vec<&str> = hits.iter().map(|h| h.title()).collect();

    assert_eq!(titles, vec!["B", "A", "C"]);
    assert!(!titles.contains(&"Zero"));
    assert!(!titles.contains(&"Wide"));
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_fewer_scoreable_than_k() {
    let corpus = corpus_from(&[
        ("one", vec![1.0, 0.0]),
        ("two", vec![0.0, 1.0]),
        ("zero", vec![0.0, 0.0]),
    ]);
    let searcher = Searcher::new(
        Arc::new(StaticEmbeddingProvider::new(vec![1.0, 1.0])),
        fast_config(50),
    );

    assert_eq!(searcher.search(&corpus, "q", 10).await.unwrap().len(), 2);
    assert_eq!(searcher.search(&corpus, "q", 1).await.unwrap().len(), 1);
    assert!(searcher.search(&corpus, "q", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_network_error_is_not_an_empty_result() {
    let corpus = corpus_from(&[("A", vec![1.0, 0.0])]);
    let provider = Arc::new(FailingEmbeddingProvider::permanent("connection refused"));
    let searcher = Searcher::new(provider.clone(), fast_config(50));

    let err = searcher.search(&corpus, "q", 5).await.unwrap_err();
    assert!(err.is_provider_failure());
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_transient_errors_exhaust_retries() {
    let corpus = corpus_from(&[("A", vec![1.0, 0.0])]);
    let provider = Arc::new(FailingEmbeddingProvider::transient("429 rate limited"));
    let searcher = Searcher::new(provider.clone(), fast_config(50));

    let err = searcher.search(&corpus, "q", 5).await.unwrap_err();
    assert!(matches!(
        err,
        NavigatorError::RetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_flaky_provider_recovers_within_budget() {
    let corpus = corpus_from(&[("A", vec![1.0, 0.0])]);
    let provider = Arc::new(FlakyEmbeddingProvider::new(2, vec![1.0, 0.0]));
    let searcher = Searcher::new(provider.clone(), fast_config(50));

    let hits = searcher.search(&corpus, "q", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_searches_share_one_cached_corpus() {
    let (_dir, path) = write_csv(MEMOS);
    let cache = CorpusCache::new(&path);
    let corpus = cache.get_or_load().unwrap();

    let provider =
        StaticEmbeddingProvider::new(vec![1.0, 0.0]).with_query("energy", vec![0.0, 1.0]);
    let searcher = Arc::new(Searcher::new(Arc::new(provider), fast_config(1)));

    let tasks: Vec<_> = ["science", "energy"]
        .into_iter()
        .map(|query| {
            let corpus = Arc::clone(&corpus);
            let searcher = Arc::clone(&searcher);
            tokio::spawn(async move {
                let hits = searcher.search_default(&corpus, query).await.unwrap();
                hits[0].title().to_string()
            })
        })
        .collect();

    let mut tops = Vec::new();
    for task in tasks {
        tops.push(task.await.unwrap());
    }
    assert_eq!(tops, vec!["A", "B"]);
    assert!(Arc::ptr_eq(&corpus, &cache.get_or_load().unwrap()));
}

#[test]
fn test_missing_corpus_file_is_fatal() {
    let err = load("no/such/dir/preembedded_memos.csv").unwrap_err();
    assert!(matches!(err, NavigatorError::LoadIo { .. }));
}
