//! Machine-readable site documents: sitemap, RSS, robots.txt and llms.txt.
//!
//! All four are regenerated in full from the published store on every call.
//! Article URLs are always canonical (`/{category}/{slug}`).
//!
//! XML bodies are built with maud so every interpolated value is escaped;
//! only the prolog and the namespaced root elements are literal text.

use chrono::{DateTime, NaiveDate, Utc};
use maud::html;

use crate::categories;
use crate::config::SiteConfig;
use crate::content::Article;
use crate::pages;

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Relative crawl priority per page tier.
const PRIORITY_ROOT: &str = "1.0";
const PRIORITY_CATEGORY: &str = "0.9";
const PRIORITY_ARTICLE: &str = "0.8";

/// One `<url>` of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Sitemap entries: root, then every category, then every article.
///
/// For `N` articles this is always `N + 1 + categories` entries.
pub fn sitemap_entries(
    config: &SiteConfig,
    articles: &[Article],
    today: NaiveDate,
) -> Vec<SitemapEntry> {
    let site = &config.site;
    let mut entries = vec![SitemapEntry {
        loc: site.base_url.clone(),
        lastmod: today,
        changefreq: "weekly",
        priority: PRIORITY_ROOT,
    }];

    entries.extend(categories::all().iter().map(|category| SitemapEntry {
        loc: site.url(&format!("/{}", category.slug)),
        lastmod: today,
        changefreq: "weekly",
        priority: PRIORITY_CATEGORY,
    }));

    entries.extend(articles.iter().map(|article| SitemapEntry {
        loc: site.url(&pages::canonical_path(&article.slug)),
        lastmod: article.metadata.published_at,
        changefreq: "monthly",
        priority: PRIORITY_ARTICLE,
    }));

    entries
}

pub fn sitemap_xml(config: &SiteConfig, articles: &[Article], today: NaiveDate) -> String {
    let entries = sitemap_entries(config, articles, today);
    let body = html! {
        @for entry in &entries {
            url {
                loc { (entry.loc) }
                lastmod { (entry.lastmod.format("%Y-%m-%d")) }
                changefreq { (entry.changefreq) }
                priority { (entry.priority) }
            }
        }
    };
    format!(
        "{XML_PROLOG}\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{}</urlset>\n",
        body.into_string()
    )
}

/// RFC 2822 date in GMT, the form RSS readers expect.
fn rfc2822(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// RSS 2.0 feed of every published article, newest first.
pub fn rss_xml(config: &SiteConfig, articles: &[Article], now: DateTime<Utc>) -> String {
    let site = &config.site;
    let mut sorted: Vec<&Article> = articles.iter().collect();
    sorted.sort_by(|a, b| {
        b.metadata
            .published_at
            .cmp(&a.metadata.published_at)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    let channel = html! {
        title { (site.name) }
        link { (site.base_url) }
        description { (site.description) }
        language { (site.language.to_lowercase()) }
        lastBuildDate { (rfc2822(now)) }
    };
    let items = html! {
        @for article in &sorted {
            @let link = site.url(&pages::canonical_path(&article.slug));
            item {
                title { (article.metadata.title) }
                link { (link) }
                guid isPermaLink="true" { (link) }
                description { (article.metadata.summary) }
                pubDate { (rfc2822(midnight_utc(article.metadata.published_at))) }
                author { (article.metadata.author.as_deref().unwrap_or(&site.default_author)) }
            }
        }
    };

    format!(
        "{XML_PROLOG}\n<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n<channel>{channel}<atom:link href=\"{self_link}\" rel=\"self\" type=\"application/rss+xml\"/>{items}</channel>\n</rss>\n",
        channel = channel.into_string(),
        self_link = site.url("/feed.xml"),
        items = items.into_string(),
    )
}

/// Allow everything except the API, and point crawlers at the sitemap.
pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}\n",
        config.site.url("/sitemap.xml")
    )
}

/// Plain-text site index for language-model crawlers.
///
/// One section per category with its articles at canonical URLs. Empty
/// categories still get a heading so the structure is visible.
pub fn llms_txt(config: &SiteConfig, articles: &[Article]) -> String {
    let site = &config.site;
    let mut out = format!("# {}\n\n> {}\n", site.name, site.description);
    for category in categories::all() {
        out.push_str(&format!(
            "\n## {}\n\n{}\n{}\n",
            category.title,
            category.description,
            site.url(&format!("/{}", category.slug))
        ));
        let members = pages::articles_in(articles, category.slug);
        if !members.is_empty() {
            out.push('\n');
        }
        for article in members {
            out.push_str(&format!(
                "- [{}]({}): {}\n",
                article.metadata.title,
                site.url(&format!("/{}/{}", category.slug, article.slug)),
                article.metadata.summary
            ));
        }
    }
    out
}
