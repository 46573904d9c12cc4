//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults, then the user file, then a handful of
//! environment variables for values that differ per deployment or must
//! never be committed.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Ivermectin Research"
//! base_url = "https://ivermectintablets2026.com"   # no trailing slash
//! description = "Evidence-based medical information on ivermectin uses, dosage, safety, and research."
//! language = "en-US"
//! default_author = "Dr. Sarah Chen, MD"
//! logo = "/logo.png"
//! og_image = "/og-image.jpg"
//!
//! [content]
//! dir = "content"           # article .mdx files
//! pages_dir = "pages"       # standalone pages (about.md)
//! assets_dir = "images"     # served under /images
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [schema]
//! article_type = "MedicalWebPage"
//! author_job_title = "Medical Doctor"
//! audience = "Patient"      # "" drops medicalAudience
//!
//! [indexing]
//! endpoint = "https://indexing.googleapis.com/v3/urlNotifications:publish"
//! scope = "https://www.googleapis.com/auth/indexing"
//! url_form = "legacy"       # "legacy" = /{slug}, "canonical" = /{category}/{slug}
//! timeout_secs = 30
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `SITE_URL` | Overrides `site.base_url` |
//! | `CRON_SECRET` | Bearer token the indexing endpoint requires |
//! | `GOOGLE_SERVICE_ACCOUNT_JSON` | Service-account key used to authenticate with Google |
//!
//! Secrets live only in memory. They are never read from `config.toml` and
//! never serialized back out.
//!
//! Relative paths in `[content]` resolve against the working directory.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
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
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity and canonical origin of the site.
    pub site: SiteSection,
    /// Where articles, pages and assets are read from.
    pub content: ContentConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// JSON-LD tuning.
    pub schema: SchemaConfig,
    /// Google Indexing API job settings.
    pub indexing: IndexingConfig,
    /// Deployment secrets, from the environment only.
    #[serde(skip)]
    pub secrets: Secrets,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.site.base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "site.base_url must start with http:// or https://".into(),
            ));
        }
        if base.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must not end with a slash".into(),
            ));
        }
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.schema.article_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "schema.article_type must not be empty".into(),
            ));
        }
        if self.indexing.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "indexing.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind `{}` is not a socket address",
                self.server.bind
            )));
        }
        Ok(())
    }

    /// Overlay deployment values from an environment lookup.
    ///
    /// Takes the lookup as a function so callers (and tests) decide where
    /// values come from.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("SITE_URL").filter(|v| !v.trim().is_empty()) {
            self.site.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secret) = env("CRON_SECRET").filter(|v| !v.is_empty()) {
            self.secrets.cron_secret = Some(secret);
        }
        if let Some(json) = env("GOOGLE_SERVICE_ACCOUNT_JSON").filter(|v| !v.trim().is_empty()) {
            self.secrets.service_account_json = Some(json);
        }
    }
}

/// Identity and canonical origin of the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site name, used as publisher and in page titles.
    pub name: String,
    /// Absolute origin every canonical URL is built from.
    pub base_url: String,
    pub description: String,
    /// BCP 47 tag for `inLanguage` and `<html lang>`.
    pub language: String,
    /// Byline used when an article names no author.
    pub default_author: String,
    /// Site-relative logo path.
    pub logo: String,
    /// Site-relative fallback social image.
    pub og_image: String,
}

impl SiteSection {
    /// Absolute URL for a site-relative path.
    ///
    /// `url("")` is the bare origin, `url("/feed.xml")` the feed.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Ivermectin Research".to_string(),
            base_url: "https://ivermectintablets2026.com".to_string(),
            description:
                "Evidence-based medical information on ivermectin uses, dosage, safety, and research."
                    .to_string(),
            language: "en-US".to_string(),
            default_author: "Dr. Sarah Chen, MD".to_string(),
            logo: "/logo.png".to_string(),
            og_image: "/og-image.jpg".to_string(),
        }
    }
}

/// Content source directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory holding article `.mdx` files.
    pub dir: PathBuf,
    /// Directory holding standalone pages such as `about.md`.
    pub pages_dir: PathBuf,
    /// Static assets served under `/images`.
    pub assets_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content"),
            pages_dir: PathBuf::from("pages"),
            assets_dir: PathBuf::from("images"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// JSON-LD tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// schema.org type of article pages.
    pub article_type: String,
    /// `jobTitle` for authors without a registry entry.
    pub author_job_title: String,
    /// `medicalAudience.audienceType`. `None` or an empty string drops the
    /// property; a file can only clear it with `audience = ""`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

impl SchemaConfig {
    /// The audience type to emit, if any.
    pub fn medical_audience(&self) -> Option<&str> {
        self.audience.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            article_type: "MedicalWebPage".to_string(),
            author_job_title: "Medical Doctor".to_string(),
            audience: Some("Patient".to_string()),
        }
    }
}

/// Which address form the indexing job submits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlForm {
    /// `/{slug}`, answered by a permanent redirect.
    #[default]
    Legacy,
    /// `/{category}/{slug}`.
    Canonical,
}

/// Google Indexing API job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexingConfig {
    /// URL notification publish endpoint.
    pub endpoint: String,
    /// OAuth scope requested for the access token.
    pub scope: String,
    pub url_form: UrlForm,
    /// Per-request timeout for token exchange and submissions.
    pub timeout_secs: u64,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://indexing.googleapis.com/v3/urlNotifications:publish".to_string(),
            scope: "https://www.googleapis.com/auth/indexing".to_string(),
            url_form: UrlForm::Legacy,
            timeout_secs: 30,
        }
    }
}

/// Deployment secrets. `Debug` redacts values.
#[derive(Clone, Default)]
pub struct Secrets {
    pub cron_secret: Option<String>,
    pub service_account_json: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("cron_secret", &state(&self.cron_secret))
            .field("service_account_json", &state(&self.service_account_json))
            .finish()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
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

/// Load config from a file path, overlaid with the process environment.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with_env(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    config.apply_env(env);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# research-hub configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.
#
# Deployment values come from the environment and are never read from here:
#   SITE_URL                     overrides site.base_url
#   CRON_SECRET                  bearer token for /api/cron/index-new-articles
#   GOOGLE_SERVICE_ACCOUNT_JSON  service-account key for the Indexing API

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Ivermectin Research"

# Absolute origin for canonical URLs, feeds and sitemaps. No trailing slash.
base_url = "https://ivermectintablets2026.com"

description = "Evidence-based medical information on ivermectin uses, dosage, safety, and research."
language = "en-US"

# Byline for articles whose front-matter has no author.
default_author = "Dr. Sarah Chen, MD"

# Site-relative paths for the publisher logo and fallback social image.
logo = "/logo.png"
og_image = "/og-image.jpg"

# ---------------------------------------------------------------------------
# Content sources (relative to the working directory)
# ---------------------------------------------------------------------------
[content]
# Article files: one .mdx (or .md) per article, slug = file name.
dir = "content"

# Standalone pages, e.g. about.md.
pages_dir = "pages"

# Static assets served under /images.
assets_dir = "images"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:3000"

# ---------------------------------------------------------------------------
# Structured data (JSON-LD)
# ---------------------------------------------------------------------------
[schema]
# schema.org type for article pages.
article_type = "MedicalWebPage"

# jobTitle for authors not in the author registry.
author_job_title = "Medical Doctor"

# medicalAudience.audienceType. Set to "" to omit medicalAudience.
audience = "Patient"

# ---------------------------------------------------------------------------
# Google Indexing API
# ---------------------------------------------------------------------------
[indexing]
endpoint = "https://indexing.googleapis.com/v3/urlNotifications:publish"
scope = "https://www.googleapis.com/auth/indexing"

# "legacy"    submits /{slug} (answered by a 301 to the canonical page)
# "canonical" submits /{category}/{slug}
url_form = "legacy"

# Timeout in seconds for each token exchange and submission request.
timeout_secs = 30
"##
}
