//! Reference linearization: corpus + catalog → one ordered verse sequence.
//!
//! The sequence is the single source of truth for page order. Previous and
//! next links are read off neighbouring positions, never computed from
//! chapter/verse arithmetic: the verse before `2:1` is whatever verse happens
//! to close chapter 1 in this snapshot, and chapter 1 may be missing entirely.
//!
//! ## Order
//!
//! ```text
//! for book in catalog order          (books missing from the corpus skipped)
//!   for chapter ascending            (0, gaps and non-containers skipped)
//!     for verse ascending            (0, null, non-string and "" skipped)
//!       emit VerseReference
//! ```

use crate::catalog::BookCatalog;
use crate::corpus::{Corpus, sparse_entries};
use crate::types::{Neighbors, VerseReference};
use serde_json::Value;

/// Immutable, canonically ordered list of verse references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseSequence {
    refs: Vec<VerseReference>,
}

impl VerseSequence {
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VerseReference> {
        self.refs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VerseReference> {
        self.refs.iter()
    }

    pub fn as_slice(&self) -> &[VerseReference] {
        &self.refs
    }

    /// Previous and next reference of position `index`.
    ///
    /// Out-of-range positions have neither.
    pub fn neighbors(&self, index: usize) -> Neighbors<'_> {
        if index >= self.refs.len() {
            return Neighbors {
                prev: None,
                next: None,
            };
        }
        Neighbors {
            prev: index.checked_sub(1).and_then(|i| self.refs.get(i)),
            next: self.refs.get(index + 1),
        }
    }

    /// Every reference with its neighbours, in order.
    pub fn walk(&self) -> impl Iterator<Item = (&VerseReference, Neighbors<'_>)> {
        self.refs
            .iter()
            .enumerate()
            .map(|(i, r)| (r, self.neighbors(i)))
    }
}

impl<'a> IntoIterator for &'a VerseSequence {
    type Item = &'a VerseReference;
    type IntoIter = std::slice::Iter<'a, VerseReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}

/// Build the canonical verse sequence.
///
/// Never fails: anything malformed below the book level is left out.
pub fn linearize(catalog: &BookCatalog, corpus: &Corpus) -> VerseSequence {
    let mut refs = Vec::new();

    for (book_index, book_name) in catalog.iter() {
        let Some(book) = corpus.book(book_name) else {
            continue;
        };
        for (chapter, verses) in sparse_entries(book) {
            for (verse, value) in sparse_entries(verses) {
                if let Value::String(text) = value {
                    if !text.is_empty() {
                        refs.push(VerseReference {
                            book_index,
                            book_name: book_name.to_string(),
                            chapter,
                            verse,
                            text: text.clone(),
                        });
                    }
                }
            }
        }
    }

    VerseSequence { refs }
}
