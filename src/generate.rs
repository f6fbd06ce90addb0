//! HTML site generation.
//!
//! Takes the linearized verse sequence and writes the final static site. The
//! output directory is wiped first, so every build is a full rebuild and page
//! paths are a pure function of `(book, chapter, verse)`.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── genesis/
//! │   └── 1/
//! │       ├── 1/index.html       # One page per verse
//! │       └── 2/index.html
//! ├── song-of-solomon/
//! │   └── ...
//! ├── sitemap.xml                # Every canonical URL, traversal order
//! ├── robots.txt                 # Points at the sitemap
//! ├── ads.txt                    # Only when AdSense is configured
//! └── CNAME                      # Only when a custom domain is configured
//! ```
//!
//! ## Verse Pages
//!
//! Each page is self-contained: inline stylesheet, inline script, canonical
//! link, Open Graph tags, prev/next buttons pointing at canonical URLs of the
//! neighbouring verses, a jump form, and a share bar.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated verse text and config strings are escaped automatically.

use crate::config::{AdsConfig, SiteConfig, SiteSection};
use crate::linearize::VerseSequence;
use crate::types::{Neighbors, VerseReference};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Refusing to wipe output directory {0}")]
    UnsafeOutputDir(PathBuf),
}

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

const ADSENSE_SCRIPT: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";
const FONTS_CSS: &str =
    "https://fonts.googleapis.com/css2?family=EB+Garamond:wght@400;500;600;700&display=swap";

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// What a generate run produced.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub output_dir: PathBuf,
    /// Verse pages written, per book in catalog order.
    pub books: Vec<(String, usize)>,
    /// Site-level files written next to the pages (`sitemap.xml`, ...).
    pub site_files: Vec<String>,
}

impl GenerateSummary {
    pub fn page_count(&self) -> usize {
        self.books.iter().map(|(_, n)| n).sum()
    }
}

pub fn generate(
    sequence: &VerseSequence,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    reset_output_dir(output_dir)?;

    let mut books: Vec<(String, usize)> = Vec::new();
    for (reference, neighbors) in sequence.walk() {
        let page = render_verse_page(reference, neighbors, config);
        let page_path = output_dir.join(page_file(reference));
        write_file(&page_path, &page.into_string())?;

        match books.last_mut() {
            Some((name, count)) if *name == reference.book_name => *count += 1,
            _ => books.push((reference.book_name.clone(), 1)),
        }
    }

    let mut site_files = Vec::new();

    write_file(
        &output_dir.join("robots.txt"),
        &render_robots(&config.site.origin),
    )?;
    site_files.push("robots.txt".to_string());

    write_file(
        &output_dir.join("sitemap.xml"),
        &render_sitemap(sequence, &config.site.origin),
    )?;
    site_files.push("sitemap.xml".to_string());

    if let Some(ads_txt) = render_ads_txt(&config.ads) {
        write_file(&output_dir.join("ads.txt"), &ads_txt)?;
        site_files.push("ads.txt".to_string());
    }

    if !config.site.cname.is_empty() {
        write_file(&output_dir.join("CNAME"), &config.site.cname)?;
        site_files.push("CNAME".to_string());
    }

    Ok(GenerateSummary {
        output_dir: output_dir.to_path_buf(),
        books,
        site_files,
    })
}

/// Relative path of a verse page: `{book}/{chapter}/{verse}/index.html`.
pub fn page_file(reference: &VerseReference) -> PathBuf {
    PathBuf::from(reference.book_slug())
        .join(reference.chapter.to_string())
        .join(reference.verse.to_string())
        .join("index.html")
}

/// Delete everything under `output_dir` and recreate it empty.
///
/// Paths without a named component (`""`, `.`, `/`) are refused.
fn reset_output_dir(output_dir: &Path) -> Result<(), GenerateError> {
    let has_name = output_dir
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if !has_name {
        return Err(GenerateError::UnsafeOutputDir(output_dir.to_path_buf()));
    }
    match fs::remove_dir_all(output_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

// ============================================================================
// Site files
// ============================================================================

pub fn render_robots(origin: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {origin}/sitemap.xml\n")
}

/// Sitemap listing every canonical URL in traversal order.
pub fn render_sitemap(sequence: &VerseSequence, origin: &str) -> String {
    let urlset = html! {
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for reference in sequence {
                url { loc { (reference.canonical_url(origin)) } }
            }
        }
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
        urlset.into_string()
    )
}

/// `ads.txt` record, or `None` when ads are disabled.
pub fn render_ads_txt(ads: &AdsConfig) -> Option<String> {
    ads.publisher_id()
        .map(|pub_id| format!("google.com, {pub_id}, DIRECT, {}", ads.ads_txt_cert))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Head metadata of one page.
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    canonical: &'a str,
}

/// Renders the base HTML document structure
fn base_document(meta: &PageMeta<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (meta.title) }
                link rel="canonical" href=(meta.canonical);
                meta name="description" content=(meta.description);
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(meta.canonical);
                meta property="og:type" content="article";
                meta name="robots" content="index,follow";
                link rel="preconnect" href="https://fonts.googleapis.com";
                link rel="preconnect" href="https://fonts.gstatic.com" crossorigin;
                link href=(FONTS_CSS) rel="stylesheet";
                style { (PreEscaped(CSS)) }
                script { (PreEscaped(JS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Logo, site title and the jump form.
fn site_header(site: &SiteSection) -> Markup {
    html! {
        header {
            img src=(site.logo_url) alt={ (site.publisher) " logo" };
            h1 { (site.title) }
            div.searchbar {
                input id="book" placeholder="Book (e.g., John)";
                input id="chap" placeholder="Chapter (e.g., 3)";
                input id="verse" placeholder="Verse (e.g., 16)";
                button onclick="goVerse()" { "Go" }
                a.nav-btn href=(site.bible_url) { "The Holy Bible" }
            }
        }
    }
}

/// Prev/next buttons. A missing neighbour renders no button.
fn verse_nav(neighbors: Neighbors<'_>, origin: &str) -> Markup {
    html! {
        div.nav {
            @if let Some(prev) = neighbors.prev {
                a.nav-btn href=(prev.canonical_url(origin)) { "⟵ Prev" }
            }
            @if let Some(next) = neighbors.next {
                a.nav-btn href=(next.canonical_url(origin)) { "Next ⟶" }
            }
        }
    }
}

mod icons {
    pub const FACEBOOK: &str = r#"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M13 22v-9h3l1-4h-4V7c0-1.1.9-2 2-2h2V1h-3a5 5 0 0 0-5 5v3H6v4h3v9h4z"/></svg>"#;
    pub const INSTAGRAM: &str = r#"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M7 2h10a5 5 0 0 1 5 5v10a5 5 0 0 1-5 5H7a5 5 0 0 1-5-5V7a5 5 0 0 1 5-5zm5 5a5 5 0 1 0 .001 10.001A5 5 0 0 0 12 7zm6.5-.75a1.25 1.25 0 1 0 0 2.5 1.25 1.25 0 0 0 0-2.5z"/></svg>"#;
    pub const X: &str = r#"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M18.3 2H21l-6.6 7.6L22 22h-6.9l-5.4-7-3.8 4.3V2h4.6v9.2z"/></svg>"#;
    pub const LINKEDIN: &str = r#"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M4 3a2 2 0 1 0 0 4 2 2 0 0 0 0-4zM2 8h4v14H2zm7 0h4v2h.1A4.4 4.4 0 0 1 17 8c3.4 0 5 2.2 5 6.1V22h-4v-6c0-2-1-3.4-2.6-3.4S12 14 12 16v6H8z"/></svg>"#;
    pub const MAIL: &str = r##"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M2 4h20v16H2z"/><path fill="#fff" d="M3 6l9 7 9-7v-1H3z"/></svg>"##;
    pub const COPY: &str = r#"<svg aria-hidden="true" width="16" height="16" viewBox="0 0 24 24"><path d="M16 1H4a2 2 0 0 0-2 2v12h2V3h12V1zm3 4H8a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h11a2 2 0 0 0 2-2V7a2 2 0 0 0-2-2z"/></svg>"#;
}

/// Share buttons for one page URL.
fn share_bar(url: &str, label: &str, instagram_url: &str) -> Markup {
    let u = encode_component(url);
    let t = encode_component(label);
    html! {
        div.share {
            a.share-btn aria-label="Share on Facebook" target="_blank" rel="noopener"
                href={ "https://www.facebook.com/sharer/sharer.php?u=" (u) } {
                (PreEscaped(icons::FACEBOOK)) span { "Facebook" }
            }
            a.share-btn aria-label="Open Instagram profile" target="_blank" rel="noopener"
                href=(instagram_url) {
                (PreEscaped(icons::INSTAGRAM)) span { "Instagram" }
            }
            a.share-btn aria-label="Post on X" target="_blank" rel="noopener"
                href={ "https://twitter.com/intent/tweet?url=" (u) "&text=" (t) } {
                (PreEscaped(icons::X)) span { "X" }
            }
            a.share-btn aria-label="Share on LinkedIn" target="_blank" rel="noopener"
                href={ "https://www.linkedin.com/sharing/share-offsite/?url=" (u) } {
                (PreEscaped(icons::LINKEDIN)) span { "LinkedIn" }
            }
            a.share-btn aria-label="Share via Email" target="_blank" rel="noopener"
                href={ "mailto:?subject=" (t) "&body=" (u) } {
                (PreEscaped(icons::MAIL)) span { "Email" }
            }
            button.share-btn aria-label="Copy link" data-url=(url) onclick="copyLink(this)" {
                (PreEscaped(icons::COPY)) span { "Copy" }
            }
            span.copied id="copied" { "Link copied" }
        }
    }
}

/// AdSense loader and one responsive slot. Empty when ads are disabled.
fn ad_block(ads: &AdsConfig) -> Markup {
    if !ads.enabled() {
        return html! {};
    }
    let client = ads.adsense_client.as_str();
    html! {
        script async src={ (ADSENSE_SCRIPT) "?client=" (client) } crossorigin="anonymous" {}
        ins.adsbygoogle style="display:block" data-ad-client=(client) data-ad-slot=(ads.ad_slot)
            data-ad-format="auto" data-full-width-responsive="true" {}
        script { (PreEscaped("(adsbygoogle = window.adsbygoogle || []).push({});")) }
    }
}

fn site_footer(site: &SiteSection) -> Markup {
    let home_label = site
        .home_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    html! {
        footer {
            (site.copyright) " "
            a href=(site.home_url) target="_blank" rel="noopener" { (home_label) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Meta description: reference, translation, and the opening of the verse.
fn page_description(reference: &VerseReference, site: &SiteSection) -> String {
    let preview: String = reference.text.chars().take(site.description_chars).collect();
    format!("{} ({}): {}…", reference.label(), site.translation, preview)
}

/// Renders one verse page.
pub fn render_verse_page(
    reference: &VerseReference,
    neighbors: Neighbors<'_>,
    config: &SiteConfig,
) -> Markup {
    let site = &config.site;
    let label = reference.label();
    let title = format!("{} — {}", label, site.title);
    let url = reference.canonical_url(&site.origin);
    let description = page_description(reference, site);
    let share_label = format!("{} ({})", label, site.translation);

    let meta = PageMeta {
        title: &title,
        description: &description,
        canonical: &url,
    };

    let content = html! {
        (site_header(site))
        main {
            (verse_nav(neighbors, &site.origin))
            div.ref { (share_label) }
            article.verse { (reference.text) }
            (share_bar(&url, &share_label, &site.instagram_url))
            (ad_block(&config.ads))
        }
        (site_footer(site))
    };

    base_document(&meta, content)
}

// ============================================================================
// Tests
// ============================================================================
