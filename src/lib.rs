//! # Research Hub
//!
//! A categorized article site for long-form medical content. Articles are
//! MDX files with YAML front-matter; the filename is the slug. Everything
//! else (category, canonical URL, related articles, structured data, feeds)
//! is derived from that slug and the front-matter.
//!
//! # Request Flow
//!
//! ```text
//! request ─▶ router (301 legacy /{slug}) ─▶ pages (resolve or NotFound) ─▶ render
//!                                               ▲
//!                          content store ─▶ classify (slug → category)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Loads articles from `content/*.mdx`, publish-date filtering, reading time |
//! | [`categories`] | The five fixed categories and their editorial introductions |
//! | [`classify`] | Slug → category: exact match, then first prefix in table order, then default |
//! | [`router`] | Legacy `/{slug}` → `/{category}/{slug}` permanent redirects |
//! | [`pages`] | Category listing and article detail resolution |
//! | [`schema`] | schema.org JSON-LD payloads |
//! | [`feeds`] | Sitemap, RSS, robots.txt and llms.txt |
//! | [`indexing`] | Daily Google Indexing API notification job |
//! | [`render`] | Maud HTML templates and Markdown rendering |
//! | [`server`] | Axum routes and middleware |
//! | [`generate`] | Static export of the whole site |
//! | [`audit`] | Consistency checks between content and the slug tables |
//! | [`config`] | `config.toml` loading, merging, validation and env overlay |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Hand-Maintained Slug Tables
//!
//! The classifier's override table decides where an article *lives*; the
//! router's redirect table decides where a legacy link *goes*. They are kept
//! as separate data because the redirect table preserves historical
//! decisions for URLs already in search indexes. When they disagree a legacy
//! link lands on a 404. [`audit`] reports every disagreement, and
//! `check --strict` fails the build on them.
//!
//! ## Prefix Order Is Significant
//!
//! A slug matched by several prefix keys takes the *first* one in table
//! order, not the longest. Reordering entries can move articles between
//! categories; [`audit`] flags slugs with more than one matching key.
//!
//! ## Stateless Requests
//!
//! The server holds no content cache. Every request re-reads the store, so
//! publishing is a file copy and scheduled articles appear at midnight UTC
//! without a restart.

pub mod audit;
pub mod authors;
pub mod categories;
pub mod classify;
pub mod config;
pub mod content;
pub mod feeds;
pub mod generate;
pub mod indexing;
pub mod naming;
pub mod output;
pub mod pages;
pub mod render;
pub mod router;
pub mod schema;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
