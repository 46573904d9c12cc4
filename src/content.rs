//! Article store backed by a flat directory of front-matter files.
//!
//! Every `.mdx` (or `.md`) file directly inside the content directory is one
//! article. The slug is the file stem, the YAML block between `---` fences is
//! the metadata, and everything after it is the raw body:
//!
//! ```text
//! content/
//! ├── ivermectin-dosage-guide.mdx
//! ├── ivermectin-side-effects-complete-safety-guide.mdx
//! └── .draft-notes.mdx          # hidden, ignored
//! ```
//!
//! ```yaml
//! ---
//! title: "Ivermectin Dosage Guide"
//! publishedAt: "2026-03-10"
//! summary: "Weight-based dosing explained."
//! author: "Dr. Michael Rodriguez"     # optional
//! image: "/images/dosage-chart.webp"  # optional
//! ---
//! ```
//!
//! Nothing is cached. Every call re-reads the directory, so edits show up on
//! the next request without a restart.
//!
//! Articles dated after "today" are scheduled, not published: they stay out of
//! every listing, feed and sitemap until their date arrives.

use chrono::NaiveDate;
use gray_matter::Matter;
use gray_matter::engine::YAML;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::naming;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: no front-matter block", .0.display())]
    MissingFrontMatter(PathBuf),
    #[error("{}: invalid front-matter: {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },
    #[error("{}: missing required field `{field}`", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
    #[error("{}: invalid publishedAt date `{value}` (expected YYYY-MM-DD)", .path.display())]
    InvalidDate { path: PathBuf, value: String },
    #[error("Duplicate article slug `{slug}`: {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

const ARTICLE_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Parsed front-matter of one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: NaiveDate,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub slug: String,
    pub metadata: Metadata,
    /// Raw body after the front-matter block. Not rendered.
    pub content: String,
    #[serde(skip)]
    pub source: PathBuf,
}

/// Front-matter as written. Every key is optional here so a missing field
/// can be reported by name instead of as a generic deserialize failure.
#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    summary: Option<String>,
    author: Option<String>,
    image: Option<String>,
}

/// A standalone Markdown page such as `pages/about.md`.
#[derive(Debug, Clone)]
pub struct Page {
    /// First `# heading`, falling back to the slug.
    pub title: String,
    pub slug: String,
    pub body: String,
}

/// Read and parse every article in `dir`.
///
/// Files are visited in file-name order. A slug claimed by two files (for
/// example `foo.md` next to `foo.mdx`) is an error.
pub fn load_all(dir: &Path) -> Result<Vec<Article>, ContentError> {
    let mut articles = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_article_file(path) {
            continue;
        }

        let article = parse_article(path)?;
        if let Some(first) = seen.get(&article.slug) {
            return Err(ContentError::DuplicateSlug {
                slug: article.slug,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        seen.insert(article.slug.clone(), path.to_path_buf());
        articles.push(article);
    }

    Ok(articles)
}

/// Articles visible on `today`, newest first.
///
/// Same-day articles are ordered by slug so listings are deterministic.
pub fn published(dir: &Path, today: NaiveDate) -> Result<Vec<Article>, ContentError> {
    let mut articles: Vec<Article> = load_all(dir)?
        .into_iter()
        .filter(|a| a.metadata.published_at <= today)
        .collect();
    sort_newest_first(&mut articles);
    Ok(articles)
}

pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.metadata
            .published_at
            .cmp(&a.metadata.published_at)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Articles whose publish date is exactly `date`.
pub fn published_on(articles: &[Article], date: NaiveDate) -> Vec<&Article> {
    articles
        .iter()
        .filter(|a| a.metadata.published_at == date)
        .collect()
}

pub fn find<'a>(articles: &'a [Article], slug: &str) -> Option<&'a Article> {
    articles.iter().find(|a| a.slug == slug)
}

/// Parse a single article file.
pub fn parse_article(path: &Path) -> Result<Article, ContentError> {
    let raw = fs::read_to_string(path)?;
    let slug = naming::slug_from_path(path).ok_or_else(|| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: "file has no usable name".into(),
    })?;
    let (metadata, content) = parse_source(path, &raw)?;
    Ok(Article {
        slug,
        metadata,
        content,
        source: path.to_path_buf(),
    })
}

fn parse_source(path: &Path, raw: &str) -> Result<(Metadata, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(raw);

    let data = parsed
        .data
        .ok_or_else(|| ContentError::MissingFrontMatter(path.to_path_buf()))?;
    let front: RawFrontMatter = data.deserialize().map_err(|e| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let required = |value: Option<String>, field: &'static str| {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ContentError::MissingField {
                path: path.to_path_buf(),
                field,
            })
    };

    let title = required(front.title, "title")?;
    let date_text = required(front.published_at, "publishedAt")?;
    let summary = required(front.summary, "summary")?;
    let published_at = NaiveDate::parse_from_str(date_text.trim(), "%Y-%m-%d").map_err(|_| {
        ContentError::InvalidDate {
            path: path.to_path_buf(),
            value: date_text.clone(),
        }
    })?;

    Ok((
        Metadata {
            title,
            published_at,
            summary,
            author: front.author.filter(|a| !a.trim().is_empty()),
            image: front.image.filter(|i| !i.trim().is_empty()),
        },
        parsed.content,
    ))
}

fn is_article_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !hidden && ARTICLE_EXTENSIONS.contains(&ext.as_str())
}

/// Load `{dir}/{slug}.md` as a standalone page, if it exists.
pub fn load_page(dir: &Path, slug: &str) -> Result<Option<Page>, ContentError> {
    let path = dir.join(format!("{slug}.md"));
    if !path.is_file() {
        return Ok(None);
    }
    let body = fs::read_to_string(&path)?;
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| slug.replace('-', " "));
    Ok(Some(Page {
        title,
        slug: slug.to_string(),
        body,
    }))
}

/// Whitespace-delimited token count of the raw body, markup included.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Minutes to read at 200 words per minute, rounded up.
pub fn reading_time(content: &str) -> usize {
    word_count(content).div_ceil(200)
}
