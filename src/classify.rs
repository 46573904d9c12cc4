//! Article → category resolution.
//!
//! Articles do not declare their category in front-matter. Instead an
//! override table maps slugs (or slug prefixes) to category slugs, and
//! [`classify`] resolves in three steps:
//!
//! 1. **Exact**: the slug is a key in [`OVERRIDES`].
//! 2. **Prefix**: the first key, in table order, that the slug starts with.
//!    Keys are short stems like `ivermectin-for-scabies`, so the long SEO
//!    slug `ivermectin-for-scabies-treatment-protocol-and-success-rates`
//!    lands in the same category without its own entry.
//! 3. **Default**: [`DEFAULT_CATEGORY`](crate::categories::DEFAULT_CATEGORY).
//!
//! The function is total: any input, including the empty string, yields a
//! registered category.
//!
//! Table order matters for step 2 when two keys both prefix a slug. The
//! table is a slice, so the order is the source order below, and
//! [`crate::audit`] reports every slug where that order decides the outcome.

use crate::categories::{self, Category};

/// Slug (or slug prefix) → category slug, in resolution order.
pub static OVERRIDES: &[(&str, &str)] = &[
    // Medical uses
    ("ivermectin-for-scabies", "medical-uses"),
    ("ivermectin-for-parasites", "medical-uses"),
    ("ivermectin-for-skin-conditions", "medical-uses"),
    ("ivermectin-for-rosacea", "medical-uses"),
    ("ivermectin-for-lice", "medical-uses"),
    ("ivermectin-for-bed-bugs", "medical-uses"),
    ("ivermectin-for-dogs", "medical-uses"),
    ("what-is-ivermectin-used-for", "medical-uses"),
    ("ivermectin-for-inflammation", "medical-uses"),
    ("ivermectin-for-arthritis", "medical-uses"),
    ("ivermectin-for-lyme-disease", "medical-uses"),
    ("ivermectin-for-pinworms", "medical-uses"),
    ("tapeworm-treatment-does-ivermectin-work", "medical-uses"),
    ("ivermectin-for-diabetes", "medical-uses"),
    ("ivermectin-and-covid-19", "medical-uses"),
    // Dosage
    ("ivermectin-dosage-guide", "dosage-administration"),
    ("ivermectin-dosage-for-humans", "dosage-administration"),
    ("how-to-take-ivermectin", "dosage-administration"),
    ("ivermectin-paste-dosage-for-humans", "dosage-administration"),
    ("liquid-ivermectin-dosage-for-humans", "dosage-administration"),
    ("ivermectin-12mg-tablets", "dosage-administration"),
    ("ivermectin-3mg-tablets", "dosage-administration"),
    ("ivermectin-tablets-vs-paste-vs-liquid", "dosage-administration"),
    ("oral-ivermectin-vs-topical", "dosage-administration"),
    ("ivermectin-dosage-for-covid", "dosage-administration"),
    ("ivermectin-for-kids", "dosage-administration"),
    ("how-long-does-ivermectin-stay-in-your-system", "dosage-administration"),
    // Safety
    ("ivermectin-side-effects", "safety-side-effects"),
    ("is-ivermectin-safe-for-humans", "safety-side-effects"),
    ("ivermectin-drug-interactions", "safety-side-effects"),
    ("ivermectin-overdose", "safety-side-effects"),
    ("ivermectin-safety-in-pregnancy-and-breastfeeding", "safety-side-effects"),
    ("can-humans-take-dog-dewormer", "safety-side-effects"),
    ("horse-ivermectin-for-humans", "safety-side-effects"),
    ("ivermectin-shelf-life", "safety-side-effects"),
    ("ivermectin-ingredients", "safety-side-effects"),
    ("parasite-cleanse-supplements", "safety-side-effects"),
    // Buying
    ("where-to-buy-ivermectin-for-humans", "buying-guide"),
    ("buy-ivermectin-online-verified-pharmacies-vs-scam-sites", "buying-guide"),
    ("ivermectin-price-guide", "buying-guide"),
    ("ivermectin-over-the-counter", "buying-guide"),
    ("how-to-get-ivermectin", "buying-guide"),
    ("ivermectin-near-me", "buying-guide"),
    ("stromectol-brand-ivermectin", "buying-guide"),
    ("ivermectin-brand-names", "buying-guide"),
    ("durvet-ivermectin-guide", "buying-guide"),
    ("parapurge-review", "buying-guide"),
    ("over-the-counter-parasite-medication", "buying-guide"),
    ("best-human-dewormer-options", "buying-guide"),
    // Research
    ("how-ivermectin-works-mechanism-of-action", "research-mechanism"),
    ("ivermectin-history-discovery-nobel-prize", "research-mechanism"),
    ("ivermectin-and-fenbendazole", "research-mechanism"),
    ("ivermectin-vs-fenbendazole", "research-mechanism"),
    ("anti-parasitic-medications-for-humans", "research-mechanism"),
    ("deworming-medicine-for-humans", "research-mechanism"),
    ("ivermectin-faq", "research-mechanism"),
    ("ivermectin-comprehensive-guide", "research-mechanism"),
    ("ivermectin-uses", "research-mechanism"),
];

/// Which resolution step produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact,
    Prefix { key: &'static str },
    Default,
}

/// Resolve an article slug to its category. Never fails.
pub fn classify(article_slug: &str) -> &'static Category {
    classify_with(OVERRIDES, article_slug).0
}

/// Like [`classify`], but also reports which step matched.
pub fn resolution(article_slug: &str) -> Resolution {
    classify_with(OVERRIDES, article_slug).1
}

/// Resolve against an arbitrary table. Entries naming an unregistered
/// category are skipped so the result is always a real category.
pub fn classify_with(
    table: &'static [(&'static str, &'static str)],
    article_slug: &str,
) -> (&'static Category, Resolution) {
    if let Some(category) = table
        .iter()
        .find(|(key, _)| *key == article_slug)
        .and_then(|(_, cat)| categories::find_category(cat))
    {
        return (category, Resolution::Exact);
    }

    for (key, cat) in table {
        if article_slug.starts_with(*key)
            && let Some(category) = categories::find_category(cat)
        {
            return (category, Resolution::Prefix { key: *key });
        }
    }

    (categories::default_category(), Resolution::Default)
}

/// Every key of `table` that is a prefix of `article_slug`, in table order.
///
/// More than one entry means table order decided the category.
pub fn prefix_keys_in(
    table: &'static [(&'static str, &'static str)],
    article_slug: &str,
) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(key, _)| article_slug != *key && article_slug.starts_with(*key))
        .map(|(key, _)| *key)
        .collect()
}
