//! CLI output formatting for `check`, `build` and `index`.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! Entities lead with their positional index and title; paths and dates
//! follow as indented context lines.
//!
//! ## Check
//!
//! ```text
//! Articles (7 published, 1 scheduled)
//! 001 Ivermectin 12mg Tablets
//!     Source: ivermectin-12mg-tablets-complete-usage-guide.mdx
//!     URL: /dosage-administration/ivermectin-12mg-tablets-complete-usage-guide
//!     Published: 2026-03-10
//!     Category: Dosage & Administration (prefix `ivermectin-12mg-tablets`)
//!
//! Categories
//!     Medical Uses & Applications: 2
//!     Dosage & Administration: 3
//!
//! Audit
//!     warning: how-long-...: redirect goes to /safety-side-effects/ but ...
//!     notice: ivermectin-12mg-...: classified by prefix `ivermectin-12mg-tablets`
//!
//! 2 warnings, 1 notice
//! ```
//!
//! ## Build
//!
//! ```text
//! Exported 7 articles to dist
//!     15 pages, 4 documents, 24 redirect stubs, 1 asset
//! ```

use chrono::NaiveDate;
use std::path::Path;

use crate::audit::{AuditReport, Severity};
use crate::categories;
use crate::classify::{self, Resolution};
use crate::content::Article;
use crate::generate::BuildSummary;
use crate::indexing::IndexingReport;
use crate::pages;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format `check` output: the store inventory, per-category counts and the
/// audit findings, warnings first.
pub fn format_check_output(
    articles: &[Article],
    today: NaiveDate,
    report: &AuditReport,
) -> Vec<String> {
    let mut lines = Vec::new();
    let (published, scheduled): (Vec<&Article>, Vec<&Article>) = articles
        .iter()
        .partition(|a| a.metadata.published_at <= today);

    lines.push(format!(
        "Articles ({} published, {} scheduled)",
        published.len(),
        scheduled.len()
    ));
    for (i, article) in articles.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), article.metadata.title));
        if let Some(name) = article.source.file_name() {
            lines.push(format!("{}Source: {}", indent(1), name.to_string_lossy()));
        }
        lines.push(format!(
            "{}URL: {}",
            indent(1),
            pages::canonical_path(&article.slug)
        ));
        let state = if article.metadata.published_at <= today {
            "Published"
        } else {
            "Scheduled"
        };
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            state,
            article.metadata.published_at.format("%Y-%m-%d")
        ));
        let how = match classify::resolution(&article.slug) {
            Resolution::Exact => "exact".to_string(),
            Resolution::Prefix { key } => format!("prefix `{key}`"),
            Resolution::Default => "default".to_string(),
        };
        lines.push(format!(
            "{}Category: {} ({})",
            indent(1),
            classify::classify(&article.slug).title,
            how
        ));
    }

    let visible: Vec<Article> = published.into_iter().cloned().collect();
    lines.push(String::new());
    lines.push("Categories".to_string());
    for category in categories::all() {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            category.title,
            pages::articles_in(&visible, category.slug).len()
        ));
    }

    let warnings: Vec<_> = report.warnings().collect();
    let notices: Vec<_> = report.notices().collect();
    if !report.findings.is_empty() {
        lines.push(String::new());
        lines.push("Audit".to_string());
        for finding in warnings.iter().chain(notices.iter()) {
            let label = match finding.severity() {
                Severity::Warning => "warning",
                Severity::Notice => "notice",
            };
            lines.push(format!("{}{}: {}", indent(1), label, finding));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(warnings.len(), "warning"),
        plural(notices.len(), "notice")
    ));
    lines
}

pub fn print_check_output(articles: &[Article], today: NaiveDate, report: &AuditReport) {
    for line in format_check_output(articles, today, report) {
        println!("{}", line);
    }
}

/// Format `build` output.
pub fn format_build_output(summary: &BuildSummary, output_dir: &Path) -> Vec<String> {
    vec![
        format!(
            "Exported {} to {}",
            plural(summary.articles, "article"),
            output_dir.display()
        ),
        format!(
            "{}{}, {}, {}, {}",
            indent(1),
            plural(summary.pages.len(), "page"),
            plural(summary.documents.len(), "document"),
            plural(summary.redirects.len(), "redirect stub"),
            plural(summary.assets, "asset"),
        ),
    ]
}

pub fn print_build_output(summary: &BuildSummary, output_dir: &Path) {
    for line in format_build_output(summary, output_dir) {
        println!("{}", line);
    }
}

/// Format `index` output: one line per submitted URL, failures with reason.
pub fn format_index_output(report: &IndexingReport) -> Vec<String> {
    let date = report.date.format("%Y-%m-%d");
    if report.articles.is_empty() {
        return vec![format!("No articles published on {date}")];
    }

    let mut lines = vec![format!("Indexing {} for {date}", plural(report.articles.len(), "article"))];
    for (i, submission) in report.submissions.iter().enumerate() {
        match &submission.error {
            None => lines.push(format!("{} {} ok", format_index(i + 1), submission.url)),
            Some(error) => {
                lines.push(format!("{} {} failed", format_index(i + 1), submission.url));
                lines.push(format!("{}{}", indent(1), error));
            }
        }
    }
    lines.push(format!(
        "{} indexed, {} failed",
        report.indexed(),
        report.failed().len()
    ));
    lines
}

pub fn print_index_output(report: &IndexingReport) {
    for line in format_index_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Finding;
    use crate::indexing::{IndexedArticle, Submission};
    use crate::test_helpers::*;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
        assert_eq!(plural(3, "redirect stub"), "3 redirect stubs");
    }

    #[test]
    fn check_output_lists_articles_and_states() {
        let articles = vec![
            article("ivermectin-dosage-guide", "2026-03-10"),
            article("ivermectin-price-guide", "2099-01-01"),
        ];
        let lines = format_check_output(&articles, fixture_today(), &AuditReport::default());
        assert_eq!(lines[0], "Articles (1 published, 1 scheduled)");
        assert_eq!(lines[1], "001 Title of ivermectin-dosage-guide");
        assert_eq!(lines[2], "    Source: ivermectin-dosage-guide.mdx");
        assert_eq!(lines[3], "    URL: /dosage-administration/ivermectin-dosage-guide");
        assert_eq!(lines[4], "    Published: 2026-03-10");
        assert_eq!(lines[5], "    Category: Dosage & Administration (exact)");
        assert!(lines.contains(&"    Scheduled: 2099-01-01".to_string()));
        assert_eq!(lines.last().unwrap(), "0 warnings, 0 notices");
    }

    #[test]
    fn check_output_counts_only_published() {
        let articles = vec![
            article("ivermectin-dosage-guide", "2026-03-10"),
            article("ivermectin-12mg-tablets", "2099-01-01"),
        ];
        let lines = format_check_output(&articles, fixture_today(), &AuditReport::default());
        assert!(lines.contains(&"    Dosage & Administration: 1".to_string()));
    }

    #[test]
    fn check_output_shows_how_category_was_resolved() {
        let articles = vec![
            article("ivermectin-for-scabies-treatment-protocol-and-success-rates", "2026-03-10"),
            article("ivermectin-myths-and-facts", "2026-03-10"),
        ];
        let lines = format_check_output(&articles, fixture_today(), &AuditReport::default());
        assert!(lines.contains(
            &"    Category: Medical Uses & Applications (prefix `ivermectin-for-scabies`)".to_string()
        ));
        assert!(lines.contains(&"    Category: Medical Uses & Applications (default)".to_string()));
    }

    #[test]
    fn check_output_puts_warnings_before_notices() {
        let report = AuditReport {
            findings: vec![
                Finding::PrefixMatch {
                    slug: "a".into(),
                    key: "a-",
                },
                Finding::MissingRedirect { slug: "b".into() },
            ],
        };
        let lines = format_check_output(&[], fixture_today(), &report);
        let warning = lines.iter().position(|l| l.starts_with("    warning:")).unwrap();
        let notice = lines.iter().position(|l| l.starts_with("    notice:")).unwrap();
        assert!(warning < notice);
        assert_eq!(lines.last().unwrap(), "1 warning, 1 notice");
    }

    #[test]
    fn build_output_summarizes_counts() {
        let summary = BuildSummary {
            pages: vec![PathBuf::from("index.html"), PathBuf::from("404.html")],
            documents: vec![PathBuf::from("sitemap.xml")],
            redirects: vec![],
            articles: 1,
            assets: 1,
        };
        let lines = format_build_output(&summary, Path::new("dist"));
        assert_eq!(lines[0], "Exported 1 article to dist");
        assert_eq!(lines[1], "    2 pages, 1 document, 0 redirect stubs, 1 asset");
    }

    #[test]
    fn index_output_with_failure() {
        let report = IndexingReport {
            date: date("2026-03-10"),
            articles: vec![IndexedArticle {
                slug: "a".into(),
                published_at: date("2026-03-10"),
                title: "A".into(),
            }],
            submissions: vec![Submission {
                url: "https://example.com/a".into(),
                error: Some("HTTP 429: quota".into()),
            }],
        };
        let lines = format_index_output(&report);
        assert_eq!(lines[0], "Indexing 1 article for 2026-03-10");
        assert_eq!(lines[1], "001 https://example.com/a failed");
        assert_eq!(lines[2], "    HTTP 429: quota");
        assert_eq!(lines[3], "0 indexed, 1 failed");
    }

    #[test]
    fn index_output_without_articles() {
        let report = IndexingReport {
            date: date("2026-03-11"),
            articles: vec![],
            submissions: vec![],
        };
        assert_eq!(
            format_index_output(&report),
            vec!["No articles published on 2026-03-11"]
        );
    }
}
