//! Corpus acquisition and sparse-key normalization.
//!
//! The corpus is a JSON document shaped `{ Book: { chapter: { verse: "text" } } }`.
//! Upstream snapshots are not consistent about the inner containers: a chapter
//! or verse level may be an object keyed by number strings, or an array whose
//! index 0 is unused and whose gaps are `null`. [`sparse_entries`] hides that
//! difference so the linearizer only ever sees ascending `(number, value)`
//! pairs.
//!
//! ## Data sources
//!
//! A [`DataSource`] is resolved once from [`DataConfig`]:
//!
//! 1. `data.url` (or `DATA_URL`) set → fetch it with a blocking HTTP GET.
//! 2. otherwise `data.local_path` exists → read it.
//! 3. otherwise → [`DataError::Unavailable`].
//!
//! There are no retries. Any failure is fatal for the run.

use crate::config::DataConfig;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data unavailable: {0}")]
    Unavailable(String),
    #[error("Data from {origin} is not well-formed: {reason}")]
    Unparsable { origin: String, reason: String },
}

/// Where the corpus is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    Local(PathBuf),
}

impl DataSource {
    /// Pick the data source for this run.
    ///
    /// `root` anchors a relative `data.local_path`.
    pub fn resolve(data: &DataConfig, root: &Path) -> Result<Self, DataError> {
        let url = data.url.trim();
        if !url.is_empty() {
            return Ok(DataSource::Remote(url.to_string()));
        }
        let local = root.join(&data.local_path);
        if local.is_file() {
            return Ok(DataSource::Local(local));
        }
        Err(DataError::Unavailable(format!(
            "no DATA_URL set and no local data at {}",
            local.display()
        )))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The parsed corpus plus a fingerprint of the bytes it came from.
#[derive(Debug, Clone)]
pub struct Corpus {
    books: Map<String, Value>,
    fingerprint: String,
}

impl Corpus {
    /// Parse corpus JSON. `origin` only labels errors.
    ///
    /// The top level must be an object keyed by book name; everything below
    /// it is tolerated as-is and filtered during linearization.
    pub fn from_slice(bytes: &[u8], origin: &str) -> Result<Self, DataError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| DataError::Unparsable {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        match value {
            Value::Object(books) => Ok(Self {
                books,
                fingerprint: hash_bytes(bytes),
            }),
            other => Err(DataError::Unparsable {
                origin: origin.to_string(),
                reason: format!("expected an object keyed by book name, found {}", kind(&other)),
            }),
        }
    }

    /// Wrap an already-parsed value, e.g. one built with `serde_json::json!`.
    pub fn from_value(value: Value) -> Result<Self, DataError> {
        let bytes = serde_json::to_vec(&value).map_err(|e| DataError::Unparsable {
            origin: "value".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes, "value")
    }

    /// The raw chapter container for a book, if the corpus has one.
    pub fn book(&self, name: &str) -> Option<&Value> {
        self.books.get(name)
    }

    /// Book names as they appear in the corpus (no particular order).
    pub fn book_names(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    /// SHA-256 of the source bytes, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Load the corpus from a resolved source.
pub fn load_corpus(source: &DataSource) -> Result<Corpus, DataError> {
    match source {
        DataSource::Remote(url) => {
            let client = reqwest::blocking::Client::new();
            fetch_corpus(&client, url)
        }
        DataSource::Local(path) => read_corpus(path),
    }
}

/// Fetch the corpus over HTTP. A non-success status is [`DataError::Unavailable`].
pub fn fetch_corpus(client: &reqwest::blocking::Client, url: &str) -> Result<Corpus, DataError> {
    let bytes = fetch_bytes(client, url)?;
    Corpus::from_slice(&bytes, url)
}

/// GET `url` and return the body, mapping transport and status failures to
/// [`DataError::Unavailable`].
pub fn fetch_bytes(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<u8>, DataError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| DataError::Unavailable(format!("failed to fetch {url}: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(DataError::Unavailable(format!(
            "failed to fetch {url}: HTTP {}",
            status.as_u16()
        )));
    }
    let bytes = response
        .bytes()
        .map_err(|e| DataError::Unavailable(format!("failed to read body of {url}: {e}")))?;
    Ok(bytes.to_vec())
}

/// Read the corpus from a local file.
pub fn read_corpus(path: &Path) -> Result<Corpus, DataError> {
    let bytes = fs::read(path)
        .map_err(|e| DataError::Unavailable(format!("failed to read {}: {e}", path.display())))?;
    Corpus::from_slice(&bytes, &path.display().to_string())
}

fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Sparse numeric containers
// ============================================================================

/// Ascending `(number, value)` pairs of a sparse numeric container.
///
/// - Array: indices `1..len` whose slot is not `null`. Index 0 is never
///   returned.
/// - Object: keys that are the decimal form of a positive integer (`"1"`,
///   `"150"`). Zero, negative, fractional, padded (`"01"`) and non-numeric
///   keys are ignored. A fractional key such as `"1.5"` is dropped rather
///   than read as verse 1.5, since chapter and verse numbers are integers.
/// - Anything else has no entries.
///
/// Both shapes come back in ascending numeric order regardless of how the
/// container stores them.
pub fn sparse_entries(container: &Value) -> Vec<(u32, &Value)> {
    match container {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, v)| !v.is_null())
            .filter_map(|(i, v)| u32::try_from(i).ok().map(|n| (n, v)))
            .collect(),
        Value::Object(map) => {
            let mut entries: Vec<(u32, &Value)> = map
                .iter()
                .filter_map(|(k, v)| parse_key(k).map(|n| (n, v)))
                .collect();
            entries.sort_by_key(|(n, _)| *n);
            entries
        }
        _ => Vec::new(),
    }
}

/// A key is valid when it round-trips as a positive integer.
fn parse_key(key: &str) -> Option<u32> {
    let n: u32 = key.parse().ok()?;
    (n > 0 && n.to_string() == key).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn keys(entries: &[(u32, &Value)]) -> Vec<u32> {
        entries.iter().map(|(n, _)| *n).collect()
    }

    // =========================================================================
    // sparse_entries
    // =========================================================================

    #[test]
    fn object_keys_sorted_numerically_not_lexically() {
        let v = json!({"10": "j", "2": "b", "1": "a"});
        assert_eq!(keys(&sparse_entries(&v)), vec![1, 2, 10]);
    }

    #[test]
    fn object_zero_and_negative_keys_ignored() {
        let v = json!({"0": "zero", "-1": "neg", "3": "c"});
        assert_eq!(keys(&sparse_entries(&v)), vec![3]);
    }

    #[test]
    fn object_non_integer_keys_ignored() {
        let v = json!({"1.5": "x", "NaN": "x", "Infinity": "x", "intro": "x", "01": "x", "2": "ok"});
        assert_eq!(keys(&sparse_entries(&v)), vec![2]);
    }

    #[test]
    fn object_keeps_null_values_for_caller_to_filter() {
        let v = json!({"1": null, "2": "b"});
        let entries = sparse_entries(&v);
        assert_eq!(keys(&entries), vec![1, 2]);
        assert!(entries[0].1.is_null());
    }

    #[test]
    fn array_skips_index_zero() {
        let v = json!(["ignored", "a", "b"]);
        let entries = sparse_entries(&v);
        assert_eq!(keys(&entries), vec![1, 2]);
        assert_eq!(entries[0].1, &json!("a"));
    }

    #[test]
    fn array_skips_null_slots() {
        let v = json!([null, "a", null, null, "d"]);
        assert_eq!(keys(&sparse_entries(&v)), vec![1, 4]);
    }

    #[test]
    fn scalars_have_no_entries() {
        assert!(sparse_entries(&json!("text")).is_empty());
        assert!(sparse_entries(&json!(42)).is_empty());
        assert!(sparse_entries(&Value::Null).is_empty());
    }

    #[test]
    fn both_shapes_yield_same_keys() {
        let object = json!({"3": "c", "1": "a"});
        let array = json!([null, "a", null, "c"]);
        assert_eq!(keys(&sparse_entries(&object)), keys(&sparse_entries(&array)));
    }

    // =========================================================================
    // Corpus parsing
    // =========================================================================

    #[test]
    fn corpus_requires_top_level_object() {
        let result = Corpus::from_slice(b"[1, 2, 3]", "test");
        match result {
            Err(DataError::Unparsable { origin, reason }) => {
                assert_eq!(origin, "test");
                assert!(reason.contains("an array"));
            }
            other => panic!("expected Unparsable, got {other:?}"),
        }
    }

    #[test]
    fn corpus_rejects_malformed_json() {
        let result = Corpus::from_slice(b"{\"Genesis\": ", "test");
        assert!(matches!(result, Err(DataError::Unparsable { .. })));
    }

    #[test]
    fn corpus_exposes_books() {
        let corpus = Corpus::from_value(json!({"Genesis": {"1": {"1": "a"}}})).unwrap();
        assert!(corpus.book("Genesis").is_some());
        assert!(corpus.book("Exodus").is_none());
        assert_eq!(corpus.book_names().collect::<Vec<_>>(), vec!["Genesis"]);
    }

    #[test]
    fn fingerprint_is_sha256_hex_of_source() {
        let corpus = Corpus::from_slice(b"{}", "test").unwrap();
        assert_eq!(
            corpus.fingerprint(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    // =========================================================================
    // Data source resolution
    // =========================================================================

    #[test]
    fn url_takes_priority_over_local_file() {
        let tmp = TempDir::new().unwrap();
        let data = DataConfig {
            url: "https://cdn.example.org/web.json".to_string(),
            ..DataConfig::default()
        };
        fs::create_dir_all(tmp.path().join("data")).unwrap();
        fs::write(tmp.path().join("data/web.json"), "{}").unwrap();

        let source = DataSource::resolve(&data, tmp.path()).unwrap();
        assert_eq!(
            source,
            DataSource::Remote("https://cdn.example.org/web.json".to_string())
        );
    }

    #[test]
    fn local_file_used_without_url() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data")).unwrap();
        fs::write(tmp.path().join("data/web.json"), "{}").unwrap();

        let source = DataSource::resolve(&DataConfig::default(), tmp.path()).unwrap();
        assert_eq!(source, DataSource::Local(tmp.path().join("data/web.json")));
    }

    #[test]
    fn no_url_and_no_local_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let result = DataSource::resolve(&DataConfig::default(), tmp.path());
        match result {
            Err(DataError::Unavailable(msg)) => assert!(msg.contains("no DATA_URL set")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn read_corpus_parses_local_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("web.json");
        fs::write(&path, r#"{"Jude": {"1": {"1": "Jude, a servant"}}}"#).unwrap();
        let corpus = read_corpus(&path).unwrap();
        assert!(corpus.book("Jude").is_some());
    }

    #[test]
    fn read_corpus_with_bad_json_is_unparsable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("web.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_corpus(&path),
            Err(DataError::Unparsable { .. })
        ));
    }
}
