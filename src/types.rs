//! Shared types passed from the linearizer to the page generator.
//!
//! A [`VerseReference`] is produced once per included verse and never changes
//! afterwards. Everything the generator needs to place and link a page is
//! derived from it.

use crate::naming;

/// One verse in canonical traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseReference {
    /// Position of the book in the catalog (0-based)
    pub book_index: usize,
    /// Canonical book name as spelled in the catalog
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    /// Verse text, always non-empty
    pub text: String,
}

impl VerseReference {
    /// URL slug of the book, e.g. `song-of-solomon`.
    pub fn book_slug(&self) -> String {
        naming::book_slug(&self.book_name)
    }

    /// Canonical site-relative identifier, e.g. `song-of-solomon/2/3/`.
    pub fn slug(&self) -> String {
        naming::verse_slug(&self.book_name, self.chapter, self.verse)
    }

    /// Absolute canonical URL under `origin`.
    pub fn canonical_url(&self, origin: &str) -> String {
        naming::canonical_url(origin, &self.book_name, self.chapter, self.verse)
    }

    /// Human-readable reference, e.g. `John 3:16`.
    pub fn label(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter, self.verse)
    }
}

/// The references immediately before and after a position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a VerseReference>,
    pub next: Option<&'a VerseReference>,
}
