//! The book catalog: canonical order and spelling of book names.
//!
//! The catalog is the only thing that decides traversal order. It is never
//! derived from the corpus, which may list books in any order or omit some.
//!
//! ## Sources
//!
//! - Built in: the 66 books of the Protestant canon, Genesis through
//!   Revelation ([`BookCatalog::standard`]).
//! - `books.json`: either a list of objects with a `name` field
//!   (`[{"name": "Genesis"}, ...]`) or a plain list of names.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Book catalog is empty")]
    Empty,
    #[error("Blank book name at position {0}")]
    BlankName(usize),
    #[error("Duplicate book name: {0}")]
    Duplicate(String),
    #[error("Book name is not usable as a path segment: {0}")]
    UnsafeName(String),
}

const STANDARD_BOOKS: &[&str] = &[
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Accepted shapes of a `books.json` entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookEntry {
    Named { name: String },
    Plain(String),
}

impl BookEntry {
    fn into_name(self) -> String {
        match self {
            BookEntry::Named { name } | BookEntry::Plain(name) => name,
        }
    }
}

/// Ordered, immutable list of canonical book names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCatalog {
    books: Vec<String>,
}

impl BookCatalog {
    /// Build a catalog from names in canonical order.
    ///
    /// Names are trimmed. Blank and duplicate names are rejected, as are names
    /// that would not stay a single directory under the output root
    /// (path separators, `.` and `..`).
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut books: Vec<String> = Vec::new();
        for (position, name) in names.into_iter().enumerate() {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::BlankName(position));
            }
            if !is_path_safe(&name) {
                return Err(CatalogError::UnsafeName(name));
            }
            if books.contains(&name) {
                return Err(CatalogError::Duplicate(name));
            }
            books.push(name);
        }
        if books.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { books })
    }

    /// The built-in 66-book catalog.
    pub fn standard() -> Self {
        Self {
            books: STANDARD_BOOKS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a `books.json` document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<BookEntry> = serde_json::from_str(json)?;
        Self::new(entries.into_iter().map(BookEntry::into_name))
    }

    /// Read a `books.json` file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise fall back to the built-in list.
    pub fn load_or_standard(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::standard()),
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Book names in canonical order, paired with their catalog index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.books.iter().map(String::as_str).enumerate()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.books.get(index).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.books.iter().position(|b| b == name)
    }
}

fn is_path_safe(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}
