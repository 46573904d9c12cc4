//! Static export.
//!
//! Renders the whole published site into a directory any static host can
//! serve. Pages use directory-style URLs so the exported paths match the
//! live server's.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── about/index.html                        # if pages/about.md exists
//! ├── medical-uses/
//! │   ├── index.html                          # category listing
//! │   └── ivermectin-for-scabies-.../index.html
//! ├── ivermectin-dosage-guide/index.html      # legacy redirect stub
//! ├── sitemap.xml  feed.xml  robots.txt  llms.txt
//! └── images/                                 # copied assets
//! ```
//!
//! Static hosts cannot answer with a 301, so each legacy redirect becomes a
//! stub page with a `refresh` meta tag and a canonical link.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::categories;
use crate::config::SiteConfig;
use crate::content::{self, ContentError};
use crate::feeds;
use crate::pages;
use crate::render;
use crate::router;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a build wrote, relative to the output directory.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// HTML pages in write order.
    pub pages: Vec<PathBuf>,
    /// Sitemap, feed, robots and llms files.
    pub documents: Vec<PathBuf>,
    /// Legacy redirect stubs.
    pub redirects: Vec<PathBuf>,
    pub articles: usize,
    pub assets: usize,
}

fn write_file(output_dir: &Path, rel: &Path, contents: &str) -> Result<PathBuf, GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    tracing::debug!(path = %rel.display(), "wrote");
    Ok(rel.to_path_buf())
}

fn index_path(segments: &[&str]) -> PathBuf {
    let mut path: PathBuf = segments.iter().collect();
    path.push("index.html");
    path
}

/// Export the site as of `now` into `output_dir`.
pub fn build(
    config: &SiteConfig,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<BuildSummary, GenerateError> {
    let today = now.date_naive();
    let articles = content::published(&config.content.dir, today)?;
    let mut summary = BuildSummary {
        articles: articles.len(),
        ..Default::default()
    };

    fs::create_dir_all(output_dir)?;

    let home = render::home_page(config, &articles).into_string();
    summary
        .pages
        .push(write_file(output_dir, Path::new("index.html"), &home)?);

    if let Some(about) = content::load_page(&config.content.pages_dir, "about")? {
        let html = render::about_page(config, &about).into_string();
        summary
            .pages
            .push(write_file(output_dir, &index_path(&["about"]), &html)?);
    }

    for category in categories::all() {
        let Ok(listing) = pages::category_listing(config, &articles, category.slug) else {
            continue;
        };
        let html = render::category_page(config, &listing).into_string();
        summary
            .pages
            .push(write_file(output_dir, &index_path(&[category.slug]), &html)?);

        for article in &listing.articles {
            let Ok(detail) = pages::article_detail(config, &articles, category.slug, &article.slug)
            else {
                continue;
            };
            let html = render::article_page(config, &detail).into_string();
            summary.pages.push(write_file(
                output_dir,
                &index_path(&[category.slug, article.slug.as_str()]),
                &html,
            )?);
        }
    }

    let not_found = render::not_found_page(config).into_string();
    summary
        .pages
        .push(write_file(output_dir, Path::new("404.html"), &not_found)?);

    let documents = [
        ("sitemap.xml", feeds::sitemap_xml(config, &articles, today)),
        ("feed.xml", feeds::rss_xml(config, &articles, now)),
        ("robots.txt", feeds::robots_txt(config)),
        ("llms.txt", feeds::llms_txt(config, &articles)),
    ];
    for (name, body) in &documents {
        summary
            .documents
            .push(write_file(output_dir, Path::new(name), body)?);
    }

    for (legacy, category) in router::REDIRECTS {
        let target = config.site.url(&format!("/{category}/{legacy}"));
        let stub = render::redirect_stub(&target).into_string();
        summary
            .redirects
            .push(write_file(output_dir, &index_path(&[*legacy]), &stub)?);
    }

    summary.assets = copy_assets(&config.content.assets_dir, &output_dir.join("images"))?;

    tracing::info!(
        pages = summary.pages.len(),
        redirects = summary.redirects.len(),
        assets = summary.assets,
        "site exported to {}",
        output_dir.display()
    );
    Ok(summary)
}

/// Copy the asset tree, returning the number of files copied. A missing
/// source directory copies nothing.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
