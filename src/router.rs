//! Canonical URL enforcement for legacy flat article addresses.
//!
//! Articles used to live at `/{slug}`. They now live at
//! `/{category}/{slug}`, and every old single-segment address must answer
//! with a permanent redirect to the new one.
//!
//! [`decide`] is the pure routing decision; [`canonical_redirect`] wraps it
//! as an axum middleware that runs before any route matching.
//!
//! The redirect table is separate from the classifier's
//! [`OVERRIDES`](crate::classify::OVERRIDES). It maps *full* legacy slugs,
//! never prefixes, and only entries listed here are redirected.

use crate::categories;
use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Legacy flat slug → category slug.
pub static REDIRECTS: &[(&str, &str)] = &[
    // Medical uses
    ("ivermectin-for-parasites-types-treated-and-effectiveness", "medical-uses"),
    ("ivermectin-for-scabies-treatment-protocol-and-success-rates", "medical-uses"),
    ("ivermectin-for-lyme-disease-treatment-protocol-evidence", "medical-uses"),
    ("ivermectin-for-pinworms-effectiveness-and-protocol", "medical-uses"),
    ("ivermectin-for-skin-conditions-rosacea-and-acne-treatment", "medical-uses"),
    ("ivermectin-for-inflammation-research-anti-inflammatory-effects", "medical-uses"),
    ("ivermectin-for-arthritis-evidence-protocols-alternatives", "medical-uses"),
    ("ivermectin-for-diabetes-research-and-evidence-2026", "medical-uses"),
    ("what-is-ivermectin-used-for-fda-approved-and-off-label-uses", "medical-uses"),
    ("tapeworm-treatment-does-ivermectin-work", "medical-uses"),
    ("anti-parasitic-medications-for-humans-complete-guide", "medical-uses"),
    ("best-human-dewormer-options-ivermectin-vs-alternatives", "medical-uses"),
    ("deworming-medicine-for-humans-options-and-protocols", "medical-uses"),
    // Dosage & administration
    ("ivermectin-dosage-for-humans-complete-guide-by-weight-and-condition", "dosage-administration"),
    ("ivermectin-12mg-tablets-complete-usage-guide", "dosage-administration"),
    ("how-to-take-ivermectin-timing-food-interactions-best-practices", "dosage-administration"),
    ("ivermectin-for-kids-pediatric-safety-and-dosing", "dosage-administration"),
    ("ivermectin-tablets-vs-paste-vs-liquid-which-form-to-choose", "dosage-administration"),
    ("ivermectin-paste-dosage-for-humans-conversion-guide", "dosage-administration"),
    ("liquid-ivermectin-dosage-for-humans-injectable-vs-oral-solutions", "dosage-administration"),
    ("oral-ivermectin-vs-topical-choosing-the-right-form", "dosage-administration"),
    ("ivermectin-dosage-for-covid-clinical-trial-protocols", "dosage-administration"),
    ("ivermectin-dosage-guide", "dosage-administration"),
    // Safety & side effects
    ("ivermectin-side-effects-complete-safety-guide", "safety-side-effects"),
    ("is-ivermectin-safe-for-humans-fda-status-and-clinical-evidence", "safety-side-effects"),
    ("ivermectin-drug-interactions-what-you-cannot-take-together", "safety-side-effects"),
    ("ivermectin-overdose-symptoms-treatment-safe-dosing", "safety-side-effects"),
    ("ivermectin-safety-in-pregnancy-and-breastfeeding", "safety-side-effects"),
    ("how-long-does-ivermectin-stay-in-your-system", "safety-side-effects"),
    ("horse-ivermectin-for-humans-safety-guide-and-conversion", "safety-side-effects"),
    ("can-humans-take-dog-dewormer-safety-analysis", "safety-side-effects"),
    ("ivermectin-side-effects", "safety-side-effects"),
    // Research & mechanism
    ("how-ivermectin-works-mechanism-of-action-explained", "research-mechanism"),
    ("ivermectin-and-covid-19-what-the-research-shows-2026-update", "research-mechanism"),
    ("ivermectin-history-discovery-nobel-prize-global-impact", "research-mechanism"),
    ("ivermectin-faq-50-common-questions-answered", "research-mechanism"),
    ("ivermectin-comprehensive-guide", "research-mechanism"),
    ("ivermectin-uses", "research-mechanism"),
    // Buying guide
    ("where-to-buy-ivermectin-for-humans-legal-options-in-2026", "buying-guide"),
    ("how-to-get-ivermectin-prescription-and-access-guide", "buying-guide"),
    ("buy-ivermectin-online-verified-pharmacies-vs-scam-sites", "buying-guide"),
    ("ivermectin-over-the-counter-states-where-available", "buying-guide"),
    ("ivermectin-near-me-finding-local-pharmacies-and-clinics", "buying-guide"),
    ("ivermectin-price-guide-cost-comparison-by-source", "buying-guide"),
    ("ivermectin-brand-names-generic-vs-branded-products", "buying-guide"),
    ("stromectol-brand-ivermectin-complete-guide-and-comparison", "buying-guide"),
    ("durvet-ivermectin-guide-paste-injectable-tablet-forms", "buying-guide"),
    ("ivermectin-ingredients-whats-in-the-tablet", "buying-guide"),
    ("ivermectin-shelf-life-storage-expiration-guidelines", "buying-guide"),
    ("ivermectin-and-fenbendazole-complete-combination-protocol", "buying-guide"),
    ("ivermectin-vs-fenbendazole-which-dewormer-is-better", "buying-guide"),
    ("parapurge-review-ivermectin-fenbendazole-supplement-analysis", "buying-guide"),
    ("parasite-cleanse-supplements-ivermectin-and-natural-options", "buying-guide"),
    ("over-the-counter-parasite-medication-whats-available", "buying-guide"),
];

/// Retired paths from earlier site layouts → the flat slug that replaced them.
pub static PATH_ALIASES: &[(&str, &str)] = &[
    (
        "/blog/how-to-take-ivermectin",
        "how-to-take-ivermectin-timing-food-interactions-best-practices",
    ),
    (
        "/blog/ivermectin-cancer-research",
        "ivermectin-for-inflammation-research-anti-inflammatory-effects",
    ),
];

/// Path prefixes that are never treated as article addresses.
pub const STATIC_PREFIXES: &[&str] = &[
    "api",
    "images",
    "_next",
    "favicon.ico",
    "robots.txt",
    "sitemap.xml",
    "feed.xml",
    "llms.txt",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    PassThrough,
    /// Permanent redirect to this absolute path.
    Redirect(String),
}

/// Look up the category a legacy slug redirects into.
pub fn redirect_target(slug: &str) -> Option<&'static str> {
    REDIRECTS
        .iter()
        .find(|(legacy, _)| *legacy == slug)
        .map(|(_, category)| *category)
}

/// Decide whether a request path must be redirected to its canonical form.
///
/// ```text
/// /ivermectin-dosage-guide          → 301 /dosage-administration/ivermectin-dosage-guide
/// /medical-uses                     → pass (category page)
/// /sitemap.xml, /images/x.webp      → pass (static)
/// /medical-uses/some-article        → pass (already two segments)
/// /unknown-slug                     → pass (404s downstream)
/// ```
pub fn decide(path: &str) -> RouteDecision {
    if let Some(slug) = alias_target(path) {
        let location = match redirect_target(slug) {
            Some(category) => format!("/{category}/{slug}"),
            None => format!("/{slug}"),
        };
        return RouteDecision::Redirect(location);
    }

    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if STATIC_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return RouteDecision::PassThrough;
    }

    let mut segments = trimmed.split('/').filter(|s| !s.is_empty());
    let (Some(slug), None) = (segments.next(), segments.next()) else {
        return RouteDecision::PassThrough;
    };

    if categories::is_category(slug) {
        return RouteDecision::PassThrough;
    }

    match redirect_target(slug) {
        Some(category) => RouteDecision::Redirect(format!("/{category}/{slug}")),
        None => RouteDecision::PassThrough,
    }
}

fn alias_target(path: &str) -> Option<&'static str> {
    let path = path.trim_end_matches('/');
    PATH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == path)
        .map(|(_, slug)| *slug)
}

/// Axum middleware applying [`decide`] to every request.
///
/// The query string, if any, is carried over to the redirect location.
pub async fn canonical_redirect(request: Request, next: Next) -> Response {
    match decide(request.uri().path()) {
        RouteDecision::PassThrough => next.run(request).await,
        RouteDecision::Redirect(mut location) => {
            if let Some(query) = request.uri().query() {
                location.push('?');
                location.push_str(query);
            }
            tracing::debug!(from = %request.uri().path(), to = %location, "canonical redirect");
            permanent_redirect(&location)
        }
    }
}

fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}
