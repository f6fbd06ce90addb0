//! # verse-site
//!
//! A static site generator that publishes one page per Bible verse. The
//! input is a nested JSON corpus (book → chapter → verse → text) and an
//! ordered book catalog; the output is a directory of self-contained HTML
//! pages plus a sitemap and robots file, ready for any static host.
//!
//! # Architecture: One Pass
//!
//! ```text
//! 1. Load       config.toml + books.json + corpus  →  SiteConfig, BookCatalog, Corpus
//! 2. Linearize  catalog × corpus                   →  VerseSequence
//! 3. Generate   sequence                           →  dist/
//! ```
//!
//! Loading is the only stage that can fail on bad data, and it fails hard:
//! a missing or malformed corpus aborts the run. Linearization never fails;
//! whatever is sparse or malformed inside the corpus is left out. Generation
//! only fails on I/O.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading over stock defaults, validation, stock config text |
//! | [`catalog`] | Canonical book order: built-in 66 books or `books.json` |
//! | [`corpus`] | Corpus loading (remote or local), data errors, sparse-key normalization |
//! | [`linearize`] | Catalog × corpus → ordered [`linearize::VerseSequence`] with positional neighbours |
//! | [`naming`] | Book slugs, page paths, canonical URLs, upstream file names |
//! | [`types`] | [`types::VerseReference`] and [`types::Neighbors`] |
//! | [`generate`] | Verse pages (Maud), sitemap, robots, `ads.txt`, `CNAME` |
//! | [`compile`] | Builds the local corpus from upstream per-book JSON |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Adjacency From Position
//!
//! Previous/next links come from neighbouring positions in the materialized
//! sequence, never from chapter/verse arithmetic. A snapshot may lack a
//! chapter or a whole book, and positional adjacency links straight across
//! the gap.
//!
//! ## Two Container Shapes, One View
//!
//! Upstream data stores chapters and verses either as objects keyed by
//! number strings or as arrays with an unused index 0. [`corpus::sparse_entries`]
//! turns both into ascending `(number, value)` pairs so nothing downstream
//! cares which shape it got.
//!
//! ## Full Rebuilds
//!
//! The output directory is wiped before every build. Page paths depend only
//! on `(book, chapter, verse)`, so two builds of the same data produce the
//! same tree.

pub mod catalog;
pub mod compile;
pub mod config;
pub mod corpus;
pub mod generate;
pub mod linearize;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
