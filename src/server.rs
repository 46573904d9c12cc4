//! HTTP surface.
//!
//! ```text
//! GET /                              home
//! GET /about                         pages/about.md
//! GET /{category}                    category listing
//! GET /{category}/{article}          article
//! GET /{article}                     301 → /{category}/{article}
//! GET /sitemap.xml /feed.xml /robots.txt /llms.txt
//! GET /api/cron/index-new-articles   bearer-authenticated indexing job
//! GET /images/*                      static assets
//! ```
//!
//! The store is re-read from disk on every request, so publishing is a file
//! copy with no restart. Filesystem work runs on the blocking pool.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{self, Article, ContentError};
use crate::feeds;
use crate::indexing::{self, GoogleIndexing, IndexingError, IndexingService};
use crate::pages::{self, NotFound};
use crate::render;
use crate::router;

pub const CRON_PATH: &str = "/api/cron/index-new-articles";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Indexing client error: {0}")]
    Indexing(#[from] IndexingError),
}

/// Failure while answering a single request. Always a 500.
#[derive(Error, Debug)]
enum RequestError {
    #[error("{0}")]
    Content(#[from] ContentError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub indexer: Arc<dyn IndexingService>,
    /// Pins "today" for publish filtering. `None` follows the UTC clock.
    pub today: Option<NaiveDate>,
}

impl AppState {
    /// State with the real Google Indexing client.
    pub fn new(config: SiteConfig) -> Result<Self, IndexingError> {
        let indexer = GoogleIndexing::new(&config)?;
        Ok(Self::with_indexer(config, Arc::new(indexer)))
    }

    pub fn with_indexer(config: SiteConfig, indexer: Arc<dyn IndexingService>) -> Self {
        Self {
            config: Arc::new(config),
            indexer,
            today: None,
        }
    }

    pub fn pinned_to(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// The full application router with middleware attached.
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.content.assets_dir);
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/sitemap.xml", get(sitemap))
        .route("/feed.xml", get(feed))
        .route("/robots.txt", get(robots))
        .route("/llms.txt", get(llms))
        .route(CRON_PATH, get(index_new_articles))
        .route("/:category", get(category))
        .route("/:category/:article", get(article))
        .nest_service("/images", assets)
        .fallback(fallback)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(router::canonical_redirect)),
        )
}

/// Bind `server.bind` and serve until the process is stopped.
pub async fn serve(config: SiteConfig) -> Result<(), ServerError> {
    let bind = config.server.bind.clone();
    let state = AppState::new(config)?;
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Listening on http://{}", bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn load_store(state: &AppState) -> Result<Vec<Article>, RequestError> {
    let dir = state.config.content.dir.clone();
    let today = state.today();
    let articles = tokio::task::spawn_blocking(move || content::published(&dir, today)).await??;
    Ok(articles)
}

fn not_found(config: &SiteConfig) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render::not_found_page(config).into_string()),
    )
        .into_response()
}

fn page(result: Result<String, NotFound>, config: &SiteConfig) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(NotFound) => not_found(config),
    }
}

async fn home(State(state): State<AppState>) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    Ok(Html(render::home_page(&state.config, &articles).into_string()).into_response())
}

async fn about(State(state): State<AppState>) -> Result<Response, RequestError> {
    let dir = state.config.content.pages_dir.clone();
    let about = tokio::task::spawn_blocking(move || content::load_page(&dir, "about")).await??;
    Ok(match about {
        Some(about) => Html(render::about_page(&state.config, &about).into_string()).into_response(),
        None => not_found(&state.config),
    })
}

async fn category(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    let config = &state.config;
    let html = pages::category_listing(config, &articles, &category_slug)
        .map(|listing| render::category_page(config, &listing).into_string());
    Ok(page(html, config))
}

async fn article(
    State(state): State<AppState>,
    Path((category_slug, article_slug)): Path<(String, String)>,
) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    let config = &state.config;
    let html = pages::article_detail(config, &articles, &category_slug, &article_slug)
        .map(|detail| render::article_page(config, &detail).into_string());
    Ok(page(html, config))
}

async fn sitemap(State(state): State<AppState>) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    let body = feeds::sitemap_xml(&state.config, &articles, state.today());
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response())
}

async fn feed(State(state): State<AppState>) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    let body = feeds::rss_xml(&state.config, &articles, Utc::now());
    Ok((
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        body,
    )
        .into_response())
}

async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        feeds::robots_txt(&state.config),
    )
        .into_response()
}

async fn llms(State(state): State<AppState>) -> Result<Response, RequestError> {
    let articles = load_store(&state).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        feeds::llms_txt(&state.config, &articles),
    )
        .into_response())
}

async fn fallback(State(state): State<AppState>) -> Response {
    not_found(&state.config)
}

/// Whether the request carries `Authorization: Bearer <secret>`.
///
/// With no secret configured nothing is authorized.
pub fn authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return false;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

async fn index_new_articles(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let config = &state.config;
    if !authorized(&headers, config.secrets.cron_secret.as_deref()) {
        tracing::warn!("unauthorized indexing request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    let today = state.today();
    let result = match load_store(&state).await {
        Ok(articles) => indexing::run(state.indexer.as_ref(), config, &articles, today).await,
        Err(RequestError::Content(e)) => Err(IndexingError::Content(e)),
        Err(e) => return e.into_response(),
    };

    match result {
        Ok(report) => Json(report.to_json()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "indexing job failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(indexing::failure_json(&e, today)),
            )
                .into_response()
        }
    }
}
