//! Build-time consistency checks between the store and the two slug tables.
//!
//! The classifier's override table and the router's redirect table are
//! maintained by hand and separately. Nothing stops them from disagreeing,
//! and a disagreement is invisible at runtime: a legacy link silently lands
//! on a 404 because the redirect points at one category while the page lives
//! in another. [`audit`] surfaces those cases for `check`.
//!
//! | Finding | Severity | Meaning |
//! |---------|----------|---------|
//! | `PrefixMatch` | notice | Category came from a prefix key, not an exact entry |
//! | `DefaultCategory` | warning | No key matched; filed under the fallback |
//! | `AmbiguousPrefix` | warning | Several keys prefix the slug; table order picked one |
//! | `RedirectDrift` | warning | Redirect category differs from the classifier's |
//! | `MissingRedirect` | warning | Article has no legacy redirect entry |
//! | `OrphanRedirect` | warning | Redirect entry names no article |
//! | `UnsafeSlug` | warning | File stem is not a lowercase URL path segment |

use std::collections::HashSet;
use std::fmt;

use crate::classify::{self, Resolution};
use crate::content::Article;
use crate::naming;
use crate::router;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Notice,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    PrefixMatch {
        slug: String,
        key: &'static str,
    },
    DefaultCategory {
        slug: String,
    },
    AmbiguousPrefix {
        slug: String,
        keys: Vec<&'static str>,
        chosen: &'static str,
    },
    RedirectDrift {
        slug: String,
        classified: &'static str,
        redirected: &'static str,
    },
    MissingRedirect {
        slug: String,
    },
    OrphanRedirect {
        slug: &'static str,
    },
    UnsafeSlug {
        slug: String,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::PrefixMatch { .. } => Severity::Notice,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::PrefixMatch { slug, key } => {
                write!(f, "{slug}: classified by prefix `{key}`")
            }
            Finding::DefaultCategory { slug } => {
                write!(f, "{slug}: no table entry, filed under the default category")
            }
            Finding::AmbiguousPrefix { slug, keys, chosen } => write!(
                f,
                "{slug}: {} prefix keys match ({}), table order picks `{chosen}`",
                keys.len(),
                keys.join(", ")
            ),
            Finding::RedirectDrift {
                slug,
                classified,
                redirected,
            } => write!(
                f,
                "{slug}: redirect goes to /{redirected}/ but the page lives under /{classified}/"
            ),
            Finding::MissingRedirect { slug } => {
                write!(f, "{slug}: no legacy redirect, /{slug} will 404")
            }
            Finding::OrphanRedirect { slug } => {
                write!(f, "{slug}: redirect entry has no article")
            }
            Finding::UnsafeSlug { slug } => {
                write!(f, "{slug}: not URL-safe, rename the file to lowercase letters, digits and hyphens")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Warning)
    }

    pub fn notices(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Notice)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

/// Audit a store against the built-in tables.
pub fn audit(articles: &[Article]) -> AuditReport {
    audit_with(articles, classify::OVERRIDES, router::REDIRECTS)
}

/// Audit a store against explicit override and redirect tables.
///
/// Per-article findings come first, in store order, followed by orphan
/// redirects in table order.
pub fn audit_with(
    articles: &[Article],
    overrides: &'static [(&'static str, &'static str)],
    redirects: &'static [(&'static str, &'static str)],
) -> AuditReport {
    let mut findings = Vec::new();

    for article in articles {
        let slug = &article.slug;
        if !naming::is_url_safe(slug) {
            findings.push(Finding::UnsafeSlug { slug: slug.clone() });
        }
        let (category, resolution) = classify::classify_with(overrides, slug);

        match resolution {
            Resolution::Exact => {}
            Resolution::Prefix { key } => {
                let keys = classify::prefix_keys_in(overrides, slug);
                if keys.len() > 1 {
                    findings.push(Finding::AmbiguousPrefix {
                        slug: slug.clone(),
                        keys,
                        chosen: key,
                    });
                } else {
                    findings.push(Finding::PrefixMatch {
                        slug: slug.clone(),
                        key,
                    });
                }
            }
            Resolution::Default => findings.push(Finding::DefaultCategory { slug: slug.clone() }),
        }

        match redirects.iter().find(|(legacy, _)| *legacy == slug.as_str()) {
            Some((_, redirected)) if *redirected != category.slug => {
                findings.push(Finding::RedirectDrift {
                    slug: slug.clone(),
                    classified: category.slug,
                    redirected: *redirected,
                });
            }
            Some(_) => {}
            None => findings.push(Finding::MissingRedirect { slug: slug.clone() }),
        }
    }

    let known: HashSet<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
    findings.extend(
        redirects
            .iter()
            .filter(|(legacy, _)| !known.contains(legacy))
            .map(|(legacy, _)| Finding::OrphanRedirect { slug: *legacy }),
    );

    AuditReport { findings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::test_helpers::*;

    static OVERRIDES: &[(&str, &str)] = &[
        ("ivermectin-dosage-guide", "dosage-administration"),
        ("ivermectin-for", "medical-uses"),
        ("ivermectin-for-kids", "dosage-administration"),
        ("how-long-does-ivermectin", "dosage-administration"),
    ];
    static REDIRECTS: &[(&str, &str)] = &[
        ("ivermectin-dosage-guide", "dosage-administration"),
        ("ivermectin-for-kids-pediatric-dosing", "dosage-administration"),
        ("how-long-does-ivermectin-stay-in-your-system", "safety-side-effects"),
        ("retired-article", "buying-guide"),
    ];

    fn store() -> Vec<Article> {
        vec![
            article("ivermectin-dosage-guide", "2026-03-10"),
            article("ivermectin-for-kids-pediatric-dosing", "2026-03-09"),
            article("how-long-does-ivermectin-stay-in-your-system", "2026-03-08"),
            article("unfiled-article", "2026-03-07"),
        ]
    }

    #[test]
    fn exact_and_consistent_article_has_no_findings() {
        let report = audit_with(&store()[..1], OVERRIDES, &REDIRECTS[..1]);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn ambiguous_prefix_reports_every_key() {
        let report = audit_with(&store(), OVERRIDES, REDIRECTS);
        assert!(report.findings.contains(&Finding::AmbiguousPrefix {
            slug: "ivermectin-for-kids-pediatric-dosing".into(),
            keys: vec!["ivermectin-for", "ivermectin-for-kids"],
            chosen: "ivermectin-for",
        }));
    }

    #[test]
    fn ambiguity_changes_the_outcome() {
        // Table order files the article under medical-uses, while the redirect
        // sends legacy links to dosage-administration.
        let report = audit_with(&store(), OVERRIDES, REDIRECTS);
        assert!(report.findings.contains(&Finding::RedirectDrift {
            slug: "ivermectin-for-kids-pediatric-dosing".into(),
            classified: "medical-uses",
            redirected: "dosage-administration",
        }));
    }

    #[test]
    fn single_prefix_is_a_notice() {
        let report = audit_with(&store(), OVERRIDES, REDIRECTS);
        let notices: Vec<&Finding> = report.notices().collect();
        assert_eq!(
            notices,
            vec![&Finding::PrefixMatch {
                slug: "how-long-does-ivermectin-stay-in-your-system".into(),
                key: "how-long-does-ivermectin",
            }]
        );
    }

    #[test]
    fn default_and_missing_redirect_reported() {
        let report = audit_with(&store(), OVERRIDES, REDIRECTS);
        assert!(report.findings.contains(&Finding::DefaultCategory {
            slug: "unfiled-article".into()
        }));
        assert!(report.findings.contains(&Finding::MissingRedirect {
            slug: "unfiled-article".into()
        }));
    }

    #[test]
    fn orphan_redirects_come_last() {
        let report = audit_with(&store(), OVERRIDES, REDIRECTS);
        assert_eq!(
            report.findings.last(),
            Some(&Finding::OrphanRedirect {
                slug: "retired-article"
            })
        );
    }

    #[test]
    fn notices_alone_are_not_warnings() {
        let articles = vec![article("how-long-does-ivermectin-stay-in-your-system", "2026-03-08")];
        static CONSISTENT: &[(&str, &str)] = &[(
            "how-long-does-ivermectin-stay-in-your-system",
            "dosage-administration",
        )];
        let report = audit_with(&articles, OVERRIDES, CONSISTENT);
        assert_eq!(report.notices().count(), 1);
        assert!(!report.has_warnings());
    }

    #[test]
    fn fixture_store_shows_known_drift() {
        let tmp = setup_fixtures();
        let articles = content::load_all(&tmp.path().join("content")).unwrap();
        let report = audit(&articles);
        assert!(report.findings.contains(&Finding::RedirectDrift {
            slug: "how-long-does-ivermectin-stay-in-your-system".into(),
            classified: "dosage-administration",
            redirected: "safety-side-effects",
        }));
        assert!(report.findings.contains(&Finding::DefaultCategory {
            slug: "ivermectin-myths-and-facts".into()
        }));
        assert!(report.has_warnings());
    }

    #[test]
    fn unsafe_file_stem_is_a_warning() {
        static TABLE: &[(&str, &str)] = &[("Ivermectin_Notes", "medical-uses")];
        let articles = vec![article("Ivermectin_Notes", "2026-03-08")];
        let report = audit_with(&articles, TABLE, TABLE);
        assert_eq!(
            report.findings,
            vec![Finding::UnsafeSlug {
                slug: "Ivermectin_Notes".into()
            }]
        );
        assert!(report.has_warnings());
    }

    #[test]
    fn fixture_slugs_are_url_safe() {
        let tmp = setup_fixtures();
        let articles = content::load_all(&tmp.path().join("content")).unwrap();
        let report = audit(&articles);
        assert!(!report.findings.iter().any(|f| matches!(f, Finding::UnsafeSlug { .. })));
    }

    #[test]
    fn display_is_one_line() {
        let finding = Finding::RedirectDrift {
            slug: "a".into(),
            classified: "medical-uses",
            redirected: "buying-guide",
        };
        let text = finding.to_string();
        assert!(!text.contains('\n'));
        assert!(text.contains("/buying-guide/"));
    }
}
