//! Slug handling shared by the content store and the renderer.
//!
//! Article slugs come straight from filenames: `ivermectin-side-effects.mdx`
//! is addressed as `ivermectin-side-effects`. Nothing rewrites them, so the
//! filename is the single source of truth for every URL an article gets.
//!
//! Heading anchors are the only place slugs are *derived*: `## Common Side
//! Effects` becomes `id="common-side-effects"` so table-of-contents links and
//! shared deep links keep working across edits of the surrounding text.

use std::path::Path;

/// Article slug for a content file: the file stem.
///
/// - `content/ivermectin-uses.mdx` → `Some("ivermectin-uses")`
/// - `content/.hidden.mdx` → `Some(".hidden")` (callers filter hidden files)
/// - `content/` → `None`
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
}

/// Convert free text into an anchor slug.
///
/// Lowercases, drops everything outside `[a-z0-9 -]`, turns runs of
/// whitespace into a single dash and collapses repeated dashes:
///
/// - `"Weight-Based Dosing"` → `"weight-based-dosing"`
/// - `"FAQ: 50 Questions!"` → `"faq-50-questions"`
/// - `"  Spaced   out  "` → `"spaced-out"`
pub fn slugify(text: &str) -> String {
    let filtered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(filtered.len());
    for c in filtered.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}

/// Whether a slug can be used verbatim as a URL path segment.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_file_stem() {
        let slug = slug_from_path(Path::new("content/ivermectin-uses.mdx"));
        assert_eq!(slug.as_deref(), Some("ivermectin-uses"));
    }

    #[test]
    fn slug_ignores_parent_directories() {
        let slug = slug_from_path(Path::new("/srv/site/content/nested/ivermectin-faq.md"));
        assert_eq!(slug.as_deref(), Some("ivermectin-faq"));
    }

    #[test]
    fn slugify_basic_heading() {
        assert_eq!(slugify("Weight-Based Dosing"), "weight-based-dosing");
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("FAQ: 50 Questions!"), "faq-50-questions");
    }

    #[test]
    fn slugify_collapses_whitespace_and_dashes() {
        assert_eq!(slugify("  Spaced   out  "), "spaced-out");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Étude"), "caf-tude");
    }

    #[test]
    fn url_safe_slugs() {
        assert!(is_url_safe("ivermectin-12mg-tablets"));
        assert!(!is_url_safe("Ivermectin"));
        assert!(!is_url_safe("with space"));
        assert!(!is_url_safe("-leading"));
        assert!(!is_url_safe(""));
    }
}
