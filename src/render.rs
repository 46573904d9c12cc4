//! HTML page rendering.
//!
//! Every page is a pure function from resolved data to [`Markup`]. The server
//! and the static export both call these, so a page looks the same whether it
//! was served live or written to disk.
//!
//! ## Pages
//!
//! | Function | Path |
//! |----------|------|
//! | [`home_page`] | `/` |
//! | [`category_page`] | `/{category}` |
//! | [`article_page`] | `/{category}/{article}` |
//! | [`about_page`] | `/about` |
//! | [`not_found_page`] | anything unresolved |
//! | [`redirect_stub`] | legacy `/{article}` in the static export |
//!
//! Article bodies are rendered as CommonMark with the GFM extensions. MDX
//! component syntax is not interpreted.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html as md_html};
use serde_json::Value;

use crate::authors;
use crate::categories::{self, Category};
use crate::config::SiteConfig;
use crate::content::{Article, Page};
use crate::naming;
use crate::pages::{self, ArticleDetail, CategoryListing};
use crate::schema;

const CSS: &str = include_str!("../static/style.css");

/// How many articles the home page lists.
const HOME_LATEST: usize = 6;

const DISCLAIMER: &str = "This article is for informational purposes only and is not a substitute for professional medical advice. Always consult a qualified healthcare provider before starting, stopping or changing any medication.";

/// Document-level metadata for [`base_document`].
struct Head<'a> {
    /// Full `<title>` text.
    title: String,
    description: &'a str,
    /// Site-relative canonical path; `""` is the home page.
    path: String,
    og_type: &'static str,
    /// Site-relative social image, falling back to `site.og_image`.
    image: Option<String>,
    schemas: Vec<&'a Value>,
}

fn page_title(config: &SiteConfig, title: &str) -> String {
    format!("{} | {}", title, config.site.name)
}

fn display_date(article: &Article) -> String {
    article.metadata.published_at.format("%B %-d, %Y").to_string()
}

/// Embed a JSON-LD payload. `</` is escaped so content cannot close the
/// script element early.
pub fn json_ld(value: &Value) -> Markup {
    let json = value.to_string().replace("</", "<\\/");
    html! {
        script type="application/ld+json" { (PreEscaped(json)) }
    }
}

fn base_document(config: &SiteConfig, head: Head<'_>, current: Option<&str>, content: Markup) -> Markup {
    let site = &config.site;
    let canonical = site.url(&head.path);
    let image = site.url(head.image.as_deref().unwrap_or(&site.og_image));
    html! {
        (DOCTYPE)
        html lang=(site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) }
                meta name="description" content=(head.description);
                link rel="canonical" href=(canonical);
                link rel="alternate" type="application/rss+xml" title=(site.name) href="/feed.xml";
                meta property="og:type" content=(head.og_type);
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.description);
                meta property="og:url" content=(canonical);
                meta property="og:image" content=(image);
                meta property="og:site_name" content=(site.name);
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(head.title);
                meta name="twitter:description" content=(head.description);
                meta name="twitter:image" content=(image);
                @for schema in &head.schemas {
                    (json_ld(schema))
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(config, current))
                main { (content) }
                (site_footer(config))
            }
        }
    }
}

fn site_header(config: &SiteConfig, current: Option<&str>) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (config.site.name) }
            nav.site-nav {
                ul {
                    @for category in categories::all() {
                        li {
                            @if current == Some(category.slug) {
                                a href={ "/" (category.slug) } aria-current="page" { (category.title) }
                            } @else {
                                a href={ "/" (category.slug) } { (category.title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p { (config.site.description) }
            nav {
                a href="/about" { "About" }
                " · "
                a href="/feed.xml" { "RSS" }
                " · "
                a href="/sitemap.xml" { "Sitemap" }
            }
        }
    }
}

fn breadcrumb_nav(category: &Category, article: Option<&Article>) -> Markup {
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" }
            " › "
            @match article {
                Some(article) => {
                    a href={ "/" (category.slug) } { (category.title) }
                    " › "
                    span { (article.metadata.title) }
                }
                None => {
                    span { (category.title) }
                }
            }
        }
    }
}

fn article_card(article: &Article, category: &Category) -> Markup {
    let href = format!("/{}/{}", category.slug, article.slug);
    html! {
        article.card {
            a href=(href) {
                img src=(schema::hero_image_path(&article.slug)) alt=(article.metadata.title) loading="lazy";
                h3 { (article.metadata.title) }
            }
            p { (article.metadata.summary) }
            time datetime=(article.metadata.published_at.format("%Y-%m-%d")) { (display_date(article)) }
        }
    }
}

pub fn home_page(config: &SiteConfig, articles: &[Article]) -> Markup {
    let organization = schema::organization_schema(config);
    let website = schema::website_schema(config);
    let head = Head {
        title: config.site.name.clone(),
        description: &config.site.description,
        path: String::new(),
        og_type: "website",
        image: None,
        schemas: vec![&organization, &website],
    };

    let content = html! {
        section.hero {
            h1 { (config.site.name) }
            p.lead { (config.site.description) }
        }
        section.categories {
            h2 { "Browse by Topic" }
            div.grid {
                @for category in categories::all() {
                    @let count = pages::articles_in(articles, category.slug).len();
                    a.category-card href={ "/" (category.slug) } data-icon=(category.icon) {
                        h3 { (category.title) }
                        p { (category.description) }
                        span.count { (count) " articles" }
                    }
                }
            }
        }
        section.latest {
            h2 { "Latest Articles" }
            div.grid {
                @for article in articles.iter().take(HOME_LATEST) {
                    (article_card(article, crate::classify::classify(&article.slug)))
                }
            }
        }
    };

    base_document(config, head, None, content)
}

pub fn category_page(config: &SiteConfig, listing: &CategoryListing<'_>) -> Markup {
    let category = listing.category;
    let intro = category.intro;
    let head = Head {
        title: page_title(config, category.title),
        description: category.description,
        path: format!("/{}", category.slug),
        og_type: "website",
        image: None,
        schemas: vec![&listing.breadcrumb],
    };

    let content = html! {
        (breadcrumb_nav(category, None))
        section.intro {
            h1 { (intro.h1) }
            p.lead { (intro.lead) }
            @for section in intro.sections {
                div.intro-section {
                    h2 { (section.title) }
                    p { (section.content) }
                    @if !section.links.is_empty() {
                        ul {
                            @for (text, href) in section.links {
                                li { a href=(href) { (text) } }
                            }
                        }
                    }
                }
            }
        }
        section.articles {
            @if listing.articles.is_empty() {
                p.empty { "No articles in this category yet." }
            } @else {
                div.grid {
                    @for article in &listing.articles {
                        (article_card(article, category))
                    }
                }
            }
        }
    };

    base_document(config, head, Some(category.slug), content)
}

fn author_box(article: &Article, default_author: &str) -> Markup {
    let name = article.metadata.author.as_deref().unwrap_or(default_author);
    html! {
        @if let Some(author) = authors::find_author(name) {
            aside.author-box {
                h3 { (author.name) }
                p.author-title { (author.title) }
                p { (author.bio) }
                p.credentials { (author.credentials.join(", ")) " · " (author.affiliation) }
            }
        }
    }
}

pub fn article_page(config: &SiteConfig, detail: &ArticleDetail<'_>) -> Markup {
    let article = detail.article;
    let category = detail.category;
    let author = article
        .metadata
        .author
        .as_deref()
        .unwrap_or(&config.site.default_author);
    let head = Head {
        title: page_title(config, &article.metadata.title),
        description: &article.metadata.summary,
        path: format!("/{}/{}", category.slug, article.slug),
        og_type: "article",
        image: Some(
            article
                .metadata
                .image
                .clone()
                .unwrap_or_else(|| schema::hero_image_path(&article.slug)),
        ),
        schemas: vec![&detail.article_schema, &detail.breadcrumb],
    };

    let content = html! {
        (breadcrumb_nav(category, Some(article)))
        article.article {
            header.article-header {
                a.category-tag href={ "/" (category.slug) } { (category.title) }
                h1 { (article.metadata.title) }
                p.article-meta {
                    time datetime=(article.metadata.published_at.format("%Y-%m-%d")) { (display_date(article)) }
                    " · "
                    span.author { (author) }
                    " · "
                    span.reading-time { (detail.reading_time) " min read" }
                }
            }
            div.article-body {
                (PreEscaped(markdown_to_html(&article.content)))
            }
            aside.disclaimer {
                strong { "Medical Disclaimer: " }
                (DISCLAIMER)
            }
            (author_box(article, &config.site.default_author))
        }
        @if !detail.related.is_empty() {
            section.related {
                h2 { "You May Also Like" }
                div.grid {
                    @for related in &detail.related {
                        (article_card(related, category))
                    }
                }
            }
        }
        a.back-link href={ "/" (category.slug) } { "← Back to " (category.title) }
    };

    base_document(config, head, Some(category.slug), content)
}

pub fn about_page(config: &SiteConfig, page: &Page) -> Markup {
    let head = Head {
        title: page_title(config, &page.title),
        description: &config.site.description,
        path: format!("/{}", page.slug),
        og_type: "website",
        image: None,
        schemas: Vec::new(),
    };
    let content = html! {
        article.page {
            (PreEscaped(markdown_to_html(&page.body)))
        }
    };
    base_document(config, head, None, content)
}

pub fn not_found_page(config: &SiteConfig) -> Markup {
    let head = Head {
        title: page_title(config, "Page Not Found"),
        description: "The page you were looking for does not exist.",
        path: "/404".to_string(),
        og_type: "website",
        image: None,
        schemas: Vec::new(),
    };
    let content = html! {
        section.not-found {
            h1 { "Page Not Found" }
            p { "The page you were looking for does not exist or has moved." }
            ul {
                @for category in categories::all() {
                    li { a href={ "/" (category.slug) } { (category.title) } }
                }
            }
            a href="/" { "Return home" }
        }
    };
    base_document(config, head, None, content)
}

/// Static stand-in for a permanent redirect, for hosts without rewrite rules.
pub fn redirect_stub(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { "Redirecting" }
                link rel="canonical" href=(target);
                meta name="robots" content="noindex";
                meta http-equiv="refresh" content={ "0; url=" (target) };
            }
            body {
                p { "Moved to " a href=(target) { (target) } "." }
            }
        }
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_MATH
}

/// Plain text of a heading, from the events following its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))))
        .filter_map(|e| match e {
            Event::Text(text) | Event::Code(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

/// Render a Markdown body to HTML.
///
/// `h2` and `h3` headings without an explicit id get one from
/// [`naming::slugify`] so sections can be linked to.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, markdown_options()).collect();

    for i in 0..events.len() {
        let wants_anchor = matches!(
            &events[i],
            Event::Start(Tag::Heading {
                level: HeadingLevel::H2 | HeadingLevel::H3,
                id: None,
                ..
            })
        );
        if !wants_anchor {
            continue;
        }
        let anchor = naming::slugify(&heading_text(&events[i + 1..]));
        if !anchor.is_empty()
            && let Event::Start(Tag::Heading { id, .. }) = &mut events[i]
        {
            *id = Some(anchor.into());
        }
    }

    let mut out = String::new();
    md_html::push_html(&mut out, events.into_iter());
    out
}
