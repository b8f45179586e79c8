//! Core data types

pub mod corpus;
pub mod search;

pub use corpus::{Corpus, LoadStats, Record};
pub use search::SearchHit;
