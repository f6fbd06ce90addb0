//! Builds the local corpus file from upstream per-book JSON.
//!
//! The upstream collection publishes one file per book, each a flat array of
//! rows in reading order:
//!
//! ```json
//! [
//!   {"type": "paragraph start"},
//!   {"type": "paragraph text", "chapterNumber": 1, "verseNumber": 1, "value": "In the beginning, "},
//!   {"type": "line text", "chapterNumber": 1, "verseNumber": 1, "value": "God created"}
//! ]
//! ```
//!
//! A verse is often split across several text rows (paragraph and poetry line
//! breaks). Fragments are joined with a single space in the order the rows
//! arrive, and runs of whitespace are collapsed. Rows that are not text, or
//! that lack a chapter or verse number, are ignored. So are rows that do not
//! have the row shape at all (`null`, a number sent as a string).
//!
//! The output is the corpus shape the build reads:
//! `{ Book: { chapter: { verse: "text" } } }`.

use crate::catalog::BookCatalog;
use crate::corpus::{self, DataError};
use crate::naming;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const TEXT_ROW_TYPES: &[&str] = &["paragraph text", "line text"];

/// One upstream row. Only the fields the compiler reads are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRow {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub chapter_number: Option<u32>,
    pub verse_number: Option<u32>,
    pub value: Option<String>,
}

/// chapter → verse → text for one book.
pub type BookText = BTreeMap<u32, BTreeMap<u32, String>>;

/// Compiled corpus, serialized with chapter and verse numbers as object keys.
pub type CompiledCorpus = BTreeMap<String, BookText>;

/// Progress of a compile, reported per book.
#[derive(Debug, Clone)]
pub enum CompileEvent {
    BookDone { name: String, chapters: usize },
}

/// Parse a book file: a JSON array of rows.
///
/// Only the outer array is required. Elements that do not deserialize as a
/// [`SourceRow`] are skipped.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<SourceRow>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_slice(bytes)?;
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Merge a book's rows into chapter/verse text.
pub fn compile_book(rows: &[SourceRow]) -> BookText {
    let mut book = BookText::new();
    for row in rows {
        let (Some(chapter), Some(verse)) = (row.chapter_number, row.verse_number) else {
            continue;
        };
        if chapter == 0 || verse == 0 {
            continue;
        }
        let is_text = row
            .kind
            .as_deref()
            .is_some_and(|k| TEXT_ROW_TYPES.contains(&k));
        if !is_text {
            continue;
        }
        let fragment = row.value.as_deref().unwrap_or("");
        let slot = book.entry(chapter).or_default().entry(verse).or_default();
        push_fragment(slot, fragment);
    }

    for verses in book.values_mut() {
        for text in verses.values_mut() {
            *text = collapse_whitespace(text);
        }
    }
    book
}

/// Append a fragment after a single space. An empty slot takes the trimmed
/// fragment as-is.
fn push_fragment(slot: &mut String, fragment: &str) {
    if slot.is_empty() {
        *slot = fragment.trim().to_string();
    } else {
        slot.push(' ');
        slot.push_str(fragment);
        *slot = slot.trim().to_string();
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Total number of verses in a compiled corpus.
pub fn verse_count(corpus: &CompiledCorpus) -> usize {
    corpus
        .values()
        .flat_map(|chapters| chapters.values())
        .map(BTreeMap::len)
        .sum()
}

/// Fetch every catalog book from `upstream_base` and compile them.
///
/// Books are fetched one after another. The first failure aborts the run.
pub fn compile_from_upstream(
    client: &reqwest::blocking::Client,
    catalog: &BookCatalog,
    upstream_base: &str,
    progress: Option<std::sync::mpsc::Sender<CompileEvent>>,
) -> Result<CompiledCorpus, CompileError> {
    let base = upstream_base.trim_end_matches('/');
    let mut out = CompiledCorpus::new();

    for (_, name) in catalog.iter() {
        let url = format!("{}/{}", base, naming::upstream_file_name(name));
        let bytes = corpus::fetch_bytes(client, &url)?;
        let rows = parse_rows(&bytes).map_err(|e| DataError::Unparsable {
            origin: url.clone(),
            reason: e.to_string(),
        })?;
        let book = compile_book(&rows);
        if let Some(tx) = &progress {
            tx.send(CompileEvent::BookDone {
                name: name.to_string(),
                chapters: book.len(),
            })
            .ok();
        }
        out.insert(name.to_string(), book);
    }
    Ok(out)
}

/// Write a compiled corpus as compact JSON, creating parent directories.
pub fn write_corpus(corpus: &CompiledCorpus, path: &Path) -> Result<(), CompileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(corpus)?;
    fs::write(path, json)?;
    Ok(())
}
