//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what was found or produced (books, verse counts, pages)
//! and shows file locations as indented context lines underneath.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Data
//!     Source: data/web.json
//!     SHA-256: 3f2a9c…
//! ```
//!
//! ## Check
//!
//! ```text
//! Books
//! 001 Genesis (50 chapters, 1533 verses)
//! 002 Exodus (40 chapters, 1213 verses)
//! 032 Jonah (3 chapters, 41 verses)
//!     Missing from data: Leviticus, Numbers
//!
//! 31102 verses in 66 books
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Genesis → genesis/ (1533 pages)
//! 002 Exodus → exodus/ (1213 pages)
//!
//! Site files
//!     robots.txt
//!     sitemap.xml
//!
//! Built 2746 verse pages → dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::BookCatalog;
use crate::compile::{CompileEvent, CompiledCorpus, verse_count};
use crate::corpus::{Corpus, DataSource};
use crate::generate::GenerateSummary;
use crate::linearize::VerseSequence;
use crate::naming;
use std::collections::BTreeSet;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Chapter and verse totals of one book, in catalog order.
struct BookTally {
    catalog_position: usize,
    name: String,
    chapters: usize,
    verses: usize,
}

fn tally_books(sequence: &VerseSequence) -> Vec<BookTally> {
    let mut tallies: Vec<BookTally> = Vec::new();
    let mut chapters_seen: BTreeSet<u32> = BTreeSet::new();
    for reference in sequence {
        let same_book = tallies
            .last()
            .is_some_and(|t| t.catalog_position == reference.book_index + 1);
        if !same_book {
            chapters_seen.clear();
            tallies.push(BookTally {
                catalog_position: reference.book_index + 1,
                name: reference.book_name.clone(),
                chapters: 0,
                verses: 0,
            });
        }
        if let Some(tally) = tallies.last_mut() {
            if chapters_seen.insert(reference.chapter) {
                tally.chapters += 1;
            }
            tally.verses += 1;
        }
    }
    tallies
}

// ============================================================================
// Load
// ============================================================================

/// Format where the corpus came from and its fingerprint.
pub fn format_data_source(source: &DataSource, corpus: &Corpus) -> Vec<String> {
    vec![
        "Data".to_string(),
        format!("{}Source: {}", indent(1), source),
        format!("{}SHA-256: {}", indent(1), corpus.fingerprint()),
    ]
}

pub fn print_data_source(source: &DataSource, corpus: &Corpus) {
    for line in format_data_source(source, corpus) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the verse inventory per book, with catalog books the data lacks.
///
/// Books are numbered by their catalog position, so gaps in the numbering
/// show missing books at a glance.
pub fn format_check_output(catalog: &BookCatalog, sequence: &VerseSequence) -> Vec<String> {
    let mut lines = vec!["Books".to_string()];
    let tallies = tally_books(sequence);

    for tally in &tallies {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(tally.catalog_position),
            tally.name,
            plural(tally.chapters, "chapter", "chapters"),
            plural(tally.verses, "verse", "verses"),
        ));
    }

    let missing: Vec<&str> = catalog
        .iter()
        .filter(|(i, _)| !tallies.iter().any(|t| t.catalog_position == i + 1))
        .map(|(_, name)| name)
        .collect();
    if !missing.is_empty() {
        lines.push(format!(
            "{}Missing from data: {}",
            indent(1),
            missing.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} in {}",
        plural(sequence.len(), "verse", "verses"),
        plural(tallies.len(), "book", "books"),
    ));
    lines
}

pub fn print_check_output(catalog: &BookCatalog, sequence: &VerseSequence) {
    for line in format_check_output(catalog, sequence) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format generate results: pages per book, site files, and the total.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, (name, pages)) in summary.books.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}/ ({})",
            format_index(i + 1),
            name,
            naming::book_slug(name),
            plural(*pages, "page", "pages"),
        ));
    }

    if !summary.site_files.is_empty() {
        lines.push(String::new());
        lines.push("Site files".to_string());
        for file in &summary.site_files {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {} → {}",
        plural(summary.page_count(), "verse page", "verse pages"),
        summary.output_dir.display()
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Make-data
// ============================================================================

/// Format a single compile progress event.
pub fn format_compile_event(event: &CompileEvent) -> Vec<String> {
    match event {
        CompileEvent::BookDone { name, chapters } => {
            vec![format!("✓ {} ({})", name, plural(*chapters, "chapter", "chapters"))]
        }
    }
}

/// Format the compile summary.
pub fn format_compile_output(corpus: &CompiledCorpus, path: &std::path::Path) -> Vec<String> {
    vec![
        String::new(),
        format!("Wrote {}", path.display()),
        format!("Total verses: {}", verse_count(corpus)),
    ]
}

pub fn print_compile_output(corpus: &CompiledCorpus, path: &std::path::Path) {
    for line in format_compile_output(corpus, path) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linearize::linearize;
    use crate::test_helpers::*;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(66), "066");
    }

    #[test]
    fn plural_picks_singular_for_one() {
        assert_eq!(plural(1, "verse", "verses"), "1 verse");
        assert_eq!(plural(0, "verse", "verses"), "0 verses");
        assert_eq!(plural(2, "verse", "verses"), "2 verses");
    }

    #[test]
    fn check_output_counts_chapters_and_verses() {
        let cat = catalog(&["Obadiah", "Jonah"]);
        let seq = linearize(&cat, &jonah_corpus());
        let lines = format_check_output(&cat, &seq);
        assert_eq!(
            lines,
            vec![
                "Books",
                "002 Jonah (2 chapters, 5 verses)",
                "    Missing from data: Obadiah",
                "",
                "5 verses in 1 book",
            ]
        );
    }

    #[test]
    fn check_output_without_missing_books() {
        let cat = catalog(&["Jonah"]);
        let seq = linearize(&cat, &jonah_corpus());
        let lines = format_check_output(&cat, &seq);
        assert!(!lines.iter().any(|l| l.contains("Missing")));
    }

    #[test]
    fn check_output_for_empty_sequence() {
        let cat = catalog(&["Genesis"]);
        let seq = linearize(&cat, &corpus(json!({})));
        let lines = format_check_output(&cat, &seq);
        assert_eq!(lines.last().unwrap(), "0 verses in 0 books");
        assert!(lines.contains(&"    Missing from data: Genesis".to_string()));
    }

    #[test]
    fn data_source_shows_origin_and_fingerprint() {
        let source = DataSource::Local(PathBuf::from("data/web.json"));
        let lines = format_data_source(&source, &corpus(json!({})));
        assert_eq!(lines[0], "Data");
        assert_eq!(lines[1], "    Source: data/web.json");
        assert!(lines[2].starts_with("    SHA-256: "));
    }

    #[test]
    fn generate_output_lists_books_files_and_total() {
        let summary = GenerateSummary {
            output_dir: PathBuf::from("dist"),
            books: vec![
                ("Song of Solomon".to_string(), 117),
                ("Jude".to_string(), 1),
            ],
            site_files: vec!["robots.txt".to_string(), "sitemap.xml".to_string()],
        };
        let lines = format_generate_output(&summary);
        assert_eq!(
            lines,
            vec![
                "001 Song of Solomon → song-of-solomon/ (117 pages)",
                "002 Jude → jude/ (1 page)",
                "",
                "Site files",
                "    robots.txt",
                "    sitemap.xml",
                "",
                "Built 118 verse pages → dist",
            ]
        );
    }

    #[test]
    fn compile_event_shows_chapter_count() {
        let event = CompileEvent::BookDone {
            name: "Jude".to_string(),
            chapters: 1,
        };
        assert_eq!(format_compile_event(&event), vec!["✓ Jude (1 chapter)"]);
    }

    #[test]
    fn compile_output_reports_total() {
        let corpus = CompiledCorpus::new();
        let lines = format_compile_output(&corpus, Path::new("data/web.json"));
        assert_eq!(lines[1], "Wrote data/web.json");
        assert_eq!(lines[2], "Total verses: 0");
    }
}
