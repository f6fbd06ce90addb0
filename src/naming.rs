//! Centralized naming for everything derived from a book name.
//!
//! Every location in the generated site comes from the same three inputs:
//! the canonical book name, the chapter number, and the verse number. Keeping
//! the derivations here means the page path, the prev/next links, and the
//! sitemap entries can never disagree.
//!
//! ## Book slugs
//!
//! The book name is lowercased and every space becomes a dash:
//! - `Genesis` → `genesis`
//! - `1 Samuel` → `1-samuel`
//! - `Song of Solomon` → `song-of-solomon`
//!
//! The jump form on each page runs the same transformation in the browser, so
//! the two must stay in sync.

/// URL slug for a book name.
pub fn book_slug(book_name: &str) -> String {
    book_name.to_lowercase().replace(' ', "-")
}

/// Site-relative identifier of a verse page, always with a trailing slash.
///
/// - `("Genesis", 1, 1)` → `genesis/1/1/`
/// - `("Song of Solomon", 2, 3)` → `song-of-solomon/2/3/`
pub fn verse_slug(book_name: &str, chapter: u32, verse: u32) -> String {
    format!("{}/{}/{}/", book_slug(book_name), chapter, verse)
}

/// Absolute canonical URL of a verse page.
///
/// `origin` carries no trailing slash; config validation enforces that.
pub fn canonical_url(origin: &str, book_name: &str, chapter: u32, verse: u32) -> String {
    format!("{}/{}", origin, verse_slug(book_name, chapter, verse))
}

/// File name of a book in the upstream per-book JSON collection.
///
/// The upstream collection drops spaces instead of dashing them:
/// `1 Samuel` → `1samuel.json`, `Song of Solomon` → `songofsolomon.json`.
pub fn upstream_file_name(book_name: &str) -> String {
    format!("{}.json", book_name.to_lowercase().replace(' ', ""))
}
