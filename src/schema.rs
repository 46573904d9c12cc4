//! schema.org JSON-LD payloads.
//!
//! Pure functions from article and category data to `serde_json::Value`.
//! Every URL is absolute, built from `site.base_url`, and article URLs always
//! use the canonical `/{category}/{slug}` form.
//!
//! Rendering into `<script type="application/ld+json">` is done by
//! [`render::json_ld`](crate::render::json_ld), which also escapes `</`.

use serde_json::{Value, json};

use crate::authors;
use crate::categories::Category;
use crate::config::SiteConfig;
use crate::content::Article;

/// Article-family schema for an article page.
///
/// `@type` comes from `schema.article_type`. Dates are the publish date for
/// both `datePublished` and `dateModified`. The image is the front-matter
/// image, else the article's hero image.
pub fn article_schema(config: &SiteConfig, article: &Article, category: &Category) -> Value {
    let site = &config.site;
    let url = site.url(&format!("/{}/{}", category.slug, article.slug));
    let published = article.metadata.published_at.format("%Y-%m-%d").to_string();
    let author = article
        .metadata
        .author
        .as_deref()
        .unwrap_or(&site.default_author);
    let job_title = authors::find_author(author)
        .map(|a| a.title)
        .unwrap_or(&config.schema.author_job_title);
    let image = match &article.metadata.image {
        Some(path) => site.url(path),
        None => site.url(&hero_image_path(&article.slug)),
    };

    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": config.schema.article_type,
        "name": article.metadata.title,
        "headline": article.metadata.title,
        "description": article.metadata.summary,
        "datePublished": published,
        "dateModified": published,
        "author": {
            "@type": "Person",
            "name": author,
            "jobTitle": job_title,
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "url": site.base_url,
            "logo": {
                "@type": "ImageObject",
                "url": site.url(&site.logo),
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": url,
        },
        "image": image,
        "url": url,
        "inLanguage": site.language,
        "isAccessibleForFree": true,
    });

    if let Some(audience) = config.schema.medical_audience()
        && let Some(obj) = schema.as_object_mut()
    {
        obj.insert(
            "medicalAudience".into(),
            json!({ "@type": "MedicalAudience", "audienceType": audience }),
        );
    }
    schema
}

/// Site-relative hero image every article is expected to have.
pub fn hero_image_path(slug: &str) -> String {
    format!("/images/{slug}-hero.webp")
}

/// `Home → Category [→ Article]` breadcrumb trail.
pub fn breadcrumb_schema(
    config: &SiteConfig,
    category: &Category,
    article: Option<&Article>,
) -> Value {
    let site = &config.site;
    let mut items = vec![
        json!({
            "@type": "ListItem",
            "position": 1,
            "name": "Home",
            "item": site.base_url,
        }),
        json!({
            "@type": "ListItem",
            "position": 2,
            "name": category.title,
            "item": site.url(&format!("/{}", category.slug)),
        }),
    ];
    if let Some(article) = article {
        items.push(json!({
            "@type": "ListItem",
            "position": 3,
            "name": article.metadata.title,
            "item": site.url(&format!("/{}/{}", category.slug, article.slug)),
        }));
    }

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

pub fn organization_schema(config: &SiteConfig) -> Value {
    let site = &config.site;
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": site.name,
        "url": site.base_url,
        "logo": site.url(&site.logo),
        "description": site.description,
        "sameAs": [],
    })
}

/// Site-level schema with a sitelinks search box action.
pub fn website_schema(config: &SiteConfig) -> Value {
    let site = &config.site;
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": site.name,
        "url": site.base_url,
        "potentialAction": {
            "@type": "SearchAction",
            "target": site.url("/search?q={search_term_string}"),
            "query-input": "required name=search_term_string",
        },
    })
}

/// `FAQPage` from `(question, answer)` pairs.
pub fn faq_schema(faqs: &[(&str, &str)]) -> Value {
    let entities: Vec<Value> = faqs
        .iter()
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": { "@type": "Answer", "text": answer },
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    })
}
