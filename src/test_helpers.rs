//! Shared test utilities for the research-hub test suite.
//!
//! Provides fixture setup, in-memory article builders, and lookup helpers
//! that panic with the available alternatives on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let articles = content::published(&tmp.path().join("content"), fixture_today()).unwrap();
//!
//! let guide = find_article(&articles, "ivermectin-dosage-guide");
//! assert_eq!(guide.metadata.author.as_deref(), Some("Dr. Michael Rodriguez"));
//! ```

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::content::{Article, Metadata};

/// Every article file in `fixtures/site/content`, scheduled ones included.
pub const FIXTURE_ARTICLE_COUNT: usize = 8;
/// Articles visible on [`fixture_today`].
pub const FIXTURE_PUBLISHED_COUNT: usize = 7;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The copy has `content/`, `pages/` and `images/` subdirectories. Tests get
/// an isolated tree they can mutate without affecting each other.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The date fixture tests treat as "today". Everything but the 2099 article
/// is already published.
pub fn fixture_today() -> NaiveDate {
    date("2026-04-01")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Stock config whose content paths point into a fixture tree.
pub fn fixture_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.content.dir = root.join("content");
    config.content.pages_dir = root.join("pages");
    config.content.assets_dir = root.join("images");
    config
}

/// Write a minimal valid article file.
pub fn write_article(dir: &Path, file_name: &str, title: &str, published_at: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(
        &path,
        format!(
            "---\ntitle: \"{title}\"\npublishedAt: \"{published_at}\"\nsummary: \"Summary of {title}\"\n---\n\nBody of {title}.\n"
        ),
    )
    .unwrap();
    path
}

// =========================================================================
// In-memory builders
// =========================================================================

/// Build an article without touching the filesystem.
pub fn article(slug: &str, published_at: &str) -> Article {
    Article {
        slug: slug.to_string(),
        metadata: Metadata {
            title: format!("Title of {slug}"),
            published_at: date(published_at),
            summary: format!("Summary of {slug}"),
            author: None,
            image: None,
        },
        content: format!("Body of {slug}."),
        source: PathBuf::from(format!("{slug}.mdx")),
    }
}

// =========================================================================
// Lookups, panicking with a clear message on miss
// =========================================================================

/// Find an article by slug. Panics if not found.
pub fn find_article<'a>(articles: &'a [Article], slug: &str) -> &'a Article {
    articles.iter().find(|a| a.slug == slug).unwrap_or_else(|| {
        let slugs = slugs(articles);
        panic!("article '{slug}' not found. Available: {slugs:?}")
    })
}

/// All slugs in store order.
pub fn slugs(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.slug.as_str()).collect()
}
