//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional user config file in the project root. The result
//! is a single [`SiteConfig`] value that is built once at startup and passed
//! by reference to every stage; nothing downstream reads the environment.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! origin = "https://web.livingwordbibles.com"   # No trailing slash
//! title = "The Holy Bible: World English Bible"
//! publisher = "Living Word Bibles"
//! translation = "WEB"
//! logo_url = "https://www.livingwordbibles.com/s/LivingWordBibles01.png"
//! bible_url = "https://www.livingwordbibles.com/read-the-bible-online/web"
//! home_url = "https://www.livingwordbibles.com"
//! instagram_url = "https://www.instagram.com/living.word.bibles/"
//! copyright = "Copyright © 2025 | Living Word Bibles | All Rights Reserved |"
//! cname = "web.livingwordbibles.com"            # "" = no CNAME file
//! description_chars = 140
//!
//! [ads]
//! adsense_client = "ca-pub-5303063222439969"    # "" = no ads, no ads.txt
//! ad_slot = "1234567890"
//! ads_txt_cert = "f08c47fec0942fa0"
//!
//! [data]
//! url = ""                                      # Overridden by DATA_URL
//! local_path = "data/web.json"
//! # books_path = "books.json"
//! upstream_base = "https://raw.githubusercontent.com/TehShrike/world-english-bible/master/json"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity, branding and links of the published site.
    pub site: SiteSection,
    /// Ad embedding and `ads.txt`.
    pub ads: AdsConfig,
    /// Where the corpus and catalog come from.
    pub data: DataConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = &self.site.origin;
        if !(origin.starts_with("https://") || origin.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "site.origin must start with http:// or https://".into(),
            ));
        }
        if origin.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.origin must not end with '/'".into(),
            ));
        }
        if self.site.description_chars == 0 {
            return Err(ConfigError::Validation(
                "site.description_chars must be greater than 0".into(),
            ));
        }
        let client = &self.ads.adsense_client;
        if !client.is_empty() && !client.starts_with("ca-pub-") {
            return Err(ConfigError::Validation(
                "ads.adsense_client must start with ca-pub-".into(),
            ));
        }
        Ok(())
    }

    /// Replace the remote data URL, e.g. from `DATA_URL`.
    ///
    /// An empty value leaves the configured URL in place.
    pub fn with_data_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.data.url = url;
        }
        self
    }
}

/// Identity, branding and outbound links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Scheme and host of the published site, without a trailing slash.
    pub origin: String,
    /// Site title, shown in the header and appended to page titles.
    pub title: String,
    /// Publisher name, used for the logo alt text.
    pub publisher: String,
    /// Short translation label shown next to each reference, e.g. `WEB`.
    pub translation: String,
    pub logo_url: String,
    /// Target of "The Holy Bible" button in the header.
    pub bible_url: String,
    /// Publisher home page linked from the footer.
    pub home_url: String,
    pub instagram_url: String,
    /// Footer copyright line.
    pub copyright: String,
    /// Custom domain written to `CNAME`. Empty disables the file.
    pub cname: String,
    /// Number of verse characters quoted in the meta description.
    pub description_chars: usize,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            origin: "https://web.livingwordbibles.com".to_string(),
            title: "The Holy Bible: World English Bible".to_string(),
            publisher: "Living Word Bibles".to_string(),
            translation: "WEB".to_string(),
            logo_url: "https://www.livingwordbibles.com/s/LivingWordBibles01.png".to_string(),
            bible_url: "https://www.livingwordbibles.com/read-the-bible-online/web".to_string(),
            home_url: "https://www.livingwordbibles.com".to_string(),
            instagram_url: "https://www.instagram.com/living.word.bibles/".to_string(),
            copyright: "Copyright © 2025 | Living Word Bibles | All Rights Reserved |"
                .to_string(),
            cname: "web.livingwordbibles.com".to_string(),
            description_chars: 140,
        }
    }
}

/// AdSense settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsConfig {
    /// Publisher client id (`ca-pub-…`). Empty disables the ad markup and
    /// `ads.txt`.
    pub adsense_client: String,
    pub ad_slot: String,
    /// Certification authority id for the `ads.txt` record.
    pub ads_txt_cert: String,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            adsense_client: "ca-pub-5303063222439969".to_string(),
            ad_slot: "1234567890".to_string(),
            ads_txt_cert: "f08c47fec0942fa0".to_string(),
        }
    }
}

impl AdsConfig {
    /// Publisher id as written in `ads.txt` (`pub-…`, without `ca-`).
    pub fn publisher_id(&self) -> Option<&str> {
        let client = self.adsense_client.as_str();
        if client.is_empty() {
            return None;
        }
        Some(client.strip_prefix("ca-").unwrap_or(client))
    }

    pub fn enabled(&self) -> bool {
        !self.adsense_client.is_empty()
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Remote corpus URL. Empty means "use the local file".
    pub url: String,
    /// Local corpus file, relative to the project root.
    pub local_path: PathBuf,
    /// Optional `books.json`, relative to the project root. When absent the
    /// built-in catalog is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_path: Option<PathBuf>,
    /// Base URL of the upstream per-book JSON files used by `make-data`.
    pub upstream_base: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            local_path: PathBuf::from("data/web.json"),
            books_path: None,
            upstream_base:
                "https://raw.githubusercontent.com/TehShrike/world-english-bible/master/json"
                    .to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# verse-site Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Scheme and host of the published site. No trailing slash.
origin = "https://web.livingwordbibles.com"

title = "The Holy Bible: World English Bible"
publisher = "Living Word Bibles"

# Short label shown after each reference, e.g. "John 3:16 (WEB)".
translation = "WEB"

logo_url = "https://www.livingwordbibles.com/s/LivingWordBibles01.png"
bible_url = "https://www.livingwordbibles.com/read-the-bible-online/web"
home_url = "https://www.livingwordbibles.com"
instagram_url = "https://www.instagram.com/living.word.bibles/"
copyright = "Copyright © 2025 | Living Word Bibles | All Rights Reserved |"

# Custom domain written to dist/CNAME. Set to "" to skip the file.
cname = "web.livingwordbibles.com"

# Number of verse characters quoted in each page's meta description.
description_chars = 140

# ---------------------------------------------------------------------------
# Ads
# ---------------------------------------------------------------------------
[ads]
# Set adsense_client to "" to publish without ads and without ads.txt.
adsense_client = "ca-pub-5303063222439969"
ad_slot = "1234567890"
ads_txt_cert = "f08c47fec0942fa0"

# ---------------------------------------------------------------------------
# Data
# ---------------------------------------------------------------------------
[data]
# Remote corpus (JSON: { Book: { chapter: { verse: "text" } } }).
# The DATA_URL environment variable overrides this value.
url = ""

# Local corpus used when no URL is set. `make-data` writes this file.
local_path = "data/web.json"

# Optional book list ([{"name": "Genesis"}, ...] or ["Genesis", ...]).
# Omit to use the built-in 66-book catalog.
# books_path = "books.json"

# Per-book JSON source read by `make-data`.
upstream_base = "https://raw.githubusercontent.com/TehShrike/world-english-bible/master/json"
"##
}
