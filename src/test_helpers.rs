//! Shared test utilities for the verse-site test suite.
//!
//! Provides compact constructors for catalogs and corpora, a sparse fixture,
//! and `proptest` strategies that generate irregular corpora.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let seq = linearize(&catalog(&["Jonah"]), &jonah_corpus());
//! assert_eq!(triples(&seq)[2], ("Jonah".to_string(), 1, 5));
//! ```

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use crate::catalog::BookCatalog;
use crate::corpus::Corpus;
use crate::linearize::VerseSequence;

// =========================================================================
// Constructors
// =========================================================================

/// Catalog from names. Panics on invalid input.
pub fn catalog(names: &[&str]) -> BookCatalog {
    BookCatalog::new(names.iter().copied()).unwrap()
}

/// Corpus from a JSON value. Panics if the top level is not an object.
pub fn corpus(value: Value) -> Corpus {
    Corpus::from_value(value).unwrap()
}

/// Jonah with chapter 2 missing and verses 3 and 4 of chapter 1 missing.
pub fn jonah_corpus() -> Corpus {
    corpus(json!({
        "Jonah": {
            "1": {"1": "v1", "2": "v2", "5": "v5"},
            "3": {"2": "c3v2", "1": "c3v1"}
        }
    }))
}

/// `(book, chapter, verse)` of every reference, in order.
pub fn triples(seq: &VerseSequence) -> Vec<(String, u32, u32)> {
    seq.iter()
        .map(|r| (r.book_name.clone(), r.chapter, r.verse))
        .collect()
}

// =========================================================================
// Shape conversion
// =========================================================================

/// Rewrite every keyed chapter and verse container of a corpus as a sparse
/// array: index 0 holds the `"0"` entry (if any), gaps are `null`.
///
/// Keys that are not plain integers are dropped, since an array cannot hold
/// them; the linearizer ignores them in either shape.
pub fn to_array_shape(corpus: &Value) -> Value {
    let Value::Object(books) = corpus else {
        return corpus.clone();
    };
    let books: Map<String, Value> = books
        .iter()
        .map(|(name, chapters)| {
            let chapters = match chapters {
                Value::Object(_) => object_to_array(chapters, |c| match c {
                    Value::Object(_) => object_to_array(c, Value::clone),
                    other => other.clone(),
                }),
                other => other.clone(),
            };
            (name.clone(), chapters)
        })
        .collect();
    Value::Object(books)
}

fn object_to_array(value: &Value, inner: impl Fn(&Value) -> Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };
    let numbered: Vec<(usize, &Value)> = map
        .iter()
        .filter_map(|(k, v)| {
            let n: usize = k.parse().ok()?;
            (n.to_string() == *k).then_some((n, v))
        })
        .collect();
    let len = numbered.iter().map(|(n, _)| n + 1).max().unwrap_or(0);
    let mut items = vec![Value::Null; len];
    for (n, v) in numbered {
        items[n] = inner(v);
    }
    Value::Array(items)
}

// =========================================================================
// proptest strategies
// =========================================================================

const BOOK_POOL: &[&str] = &["Genesis", "Ruth", "Song of Solomon", "Jonah", "Mark", "Jude"];

fn keyed<K: ToString>(entries: std::collections::BTreeMap<K, Value>) -> Value {
    Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn verse_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        1 => Just(json!("")),
        1 => Just(json!(7)),
        6 => "[a-z ]{1,12}".prop_map(Value::String),
    ]
}

fn chapter_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        8 => prop::collection::btree_map(0u32..9, verse_value(), 0..6).prop_map(keyed),
    ]
}

fn book_value() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(0u32..6, chapter_value(), 0..4).prop_map(keyed)
}

/// A shuffled catalog drawn from a small pool, and a corpus over the same
/// pool in which any level may be missing, sparse, or malformed.
pub fn catalog_and_corpus_strategy() -> impl Strategy<Value = (BookCatalog, Value)> {
    let cat = prop::sample::subsequence(BOOK_POOL.to_vec(), 1..=BOOK_POOL.len())
        .prop_shuffle()
        .prop_map(|names| BookCatalog::new(names).unwrap());
    let books =
        prop::collection::btree_map(prop::sample::select(BOOK_POOL.to_vec()), book_value(), 0..4)
            .prop_map(keyed);
    (cat, books)
}
