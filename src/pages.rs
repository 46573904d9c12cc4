//! Category and article page resolution.
//!
//! Turns a request for `/{category}` or `/{category}/{article}` into the data
//! a template needs, or [`NotFound`]. Category membership is always computed
//! by the classifier. An article requested under the wrong category is not
//! found; there is no redirect to the right one.

use serde_json::Value;

use crate::categories::{self, Category};
use crate::classify;
use crate::config::SiteConfig;
use crate::content::{self, Article};
use crate::schema;

/// How many same-category articles an article page links to.
pub const RELATED_LIMIT: usize = 4;

/// The requested page does not exist. Deliberately carries no reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

#[derive(Debug)]
pub struct CategoryListing<'a> {
    pub category: &'static Category,
    /// Members in store order.
    pub articles: Vec<&'a Article>,
    pub breadcrumb: Value,
}

#[derive(Debug)]
pub struct ArticleDetail<'a> {
    pub article: &'a Article,
    pub category: &'static Category,
    pub reading_time: usize,
    pub related: Vec<&'a Article>,
    pub article_schema: Value,
    pub breadcrumb: Value,
}

/// Every article the classifier files under `category_slug`, in store order.
pub fn articles_in<'a>(articles: &'a [Article], category_slug: &str) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| classify::classify(&a.slug).slug == category_slug)
        .collect()
}

pub fn category_listing<'a>(
    config: &SiteConfig,
    articles: &'a [Article],
    category_slug: &str,
) -> Result<CategoryListing<'a>, NotFound> {
    let category = categories::find_category(category_slug).ok_or(NotFound)?;
    Ok(CategoryListing {
        category,
        articles: articles_in(articles, category.slug),
        breadcrumb: schema::breadcrumb_schema(config, category, None),
    })
}

pub fn article_detail<'a>(
    config: &SiteConfig,
    articles: &'a [Article],
    category_slug: &str,
    article_slug: &str,
) -> Result<ArticleDetail<'a>, NotFound> {
    let article = content::find(articles, article_slug).ok_or(NotFound)?;
    let category = classify::classify(&article.slug);
    if category.slug != category_slug {
        return Err(NotFound);
    }

    let related = articles_in(articles, category.slug)
        .into_iter()
        .filter(|a| a.slug != article.slug)
        .take(RELATED_LIMIT)
        .collect();

    Ok(ArticleDetail {
        article,
        category,
        reading_time: content::reading_time(&article.content),
        related,
        article_schema: schema::article_schema(config, article, category),
        breadcrumb: schema::breadcrumb_schema(config, category, Some(article)),
    })
}

/// Canonical site-relative path of an article.
pub fn canonical_path(article_slug: &str) -> String {
    format!("/{}/{}", classify::classify(article_slug).slug, article_slug)
}
