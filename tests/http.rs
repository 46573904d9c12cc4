//! HTTP behavior of the full router, driven in-process with `oneshot`.

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::NaiveDate;
use research_hub::config::SiteConfig;
use research_hub::indexing::{AccessToken, IndexingError, IndexingService};
use research_hub::server::{AppState, CRON_PATH, app};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use walkdir::WalkDir;

const SECRET: &str = "s3cret";

#[derive(Default)]
struct RecordingIndexer {
    fail_auth: bool,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl IndexingService for RecordingIndexer {
    async fn authenticate(&self) -> Result<AccessToken, IndexingError> {
        self.calls.lock().unwrap().push("auth".into());
        if self.fail_auth {
            return Err(IndexingError::MissingCredentials);
        }
        Ok(AccessToken("token".into()))
    }

    async fn submit(&self, _token: &AccessToken, url: &str) -> Result<(), IndexingError> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in WalkDir::new(&src) {
        let entry = entry.unwrap();
        let target = tmp.path().join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
    tmp
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.content.dir = root.join("content");
    config.content.pages_dir = root.join("pages");
    config.content.assets_dir = root.join("images");
    config.secrets.cron_secret = Some(SECRET.to_string());
    config
}

fn site(root: &Path, today: &str, indexer: Arc<RecordingIndexer>) -> Router {
    app(AppState::with_indexer(config(root), indexer).pinned_to(day(today)))
}

fn fixture_app(root: &Path) -> Router {
    site(root, "2026-04-01", Arc::new(RecordingIndexer::default()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

fn cron_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(CRON_PATH);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

// =========================================================================
// Redirects
// =========================================================================

#[tokio::test]
async fn legacy_slug_is_permanently_redirected() {
    let tmp = fixture_site();
    let (status, location, _) = get(fixture_app(tmp.path()), "/ivermectin-dosage-guide").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        location.as_deref(),
        Some("/dosage-administration/ivermectin-dosage-guide")
    );
}

#[tokio::test]
async fn redirect_keeps_query_string() {
    let tmp = fixture_site();
    let (status, location, _) =
        get(fixture_app(tmp.path()), "/ivermectin-dosage-guide?utm_source=news").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        location.as_deref(),
        Some("/dosage-administration/ivermectin-dosage-guide?utm_source=news")
    );
}

#[tokio::test]
async fn blog_alias_redirects_in_one_hop() {
    let tmp = fixture_site();
    let (status, location, _) = get(fixture_app(tmp.path()), "/blog/how-to-take-ivermectin").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        location.as_deref(),
        Some("/dosage-administration/how-to-take-ivermectin-timing-food-interactions-best-practices")
    );
}

#[tokio::test]
async fn unknown_single_segment_is_not_found() {
    let tmp = fixture_site();
    let (status, location, body) = get(fixture_app(tmp.path()), "/no-such-article").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(location.is_none());
    assert!(body.contains("Page Not Found"));
}

// =========================================================================
// Pages
// =========================================================================

#[tokio::test]
async fn home_page_renders() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Latest Articles"));
}

#[tokio::test]
async fn category_page_lists_members() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/dosage-administration").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/dosage-administration/ivermectin-dosage-guide"));
    assert!(body.contains("/dosage-administration/ivermectin-12mg-tablets-complete-usage-guide"));
}

#[tokio::test]
async fn article_under_its_category_renders() {
    let tmp = fixture_site();
    let (status, _, body) =
        get(fixture_app(tmp.path()), "/dosage-administration/ivermectin-dosage-guide").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ivermectin Dosage Guide: Weight-Based Charts"));
    assert!(body.contains(r#"<h2 id="weight-based-dosing">"#));
    assert!(body.contains("Dr. Michael Rodriguez"));
}

#[tokio::test]
async fn article_under_wrong_category_is_not_found() {
    let tmp = fixture_site();
    let (status, location, _) =
        get(fixture_app(tmp.path()), "/buying-guide/ivermectin-dosage-guide").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(location.is_none());
}

#[tokio::test]
async fn prefix_classified_article_renders_under_its_category() {
    let tmp = fixture_site();
    let (status, _, body) = get(
        fixture_app(tmp.path()),
        "/medical-uses/ivermectin-for-scabies-treatment-protocol-and-success-rates",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ivermectin for Scabies: Treatment Protocol and Success Rates"));
}

#[tokio::test]
async fn prefix_classified_article_under_other_category_is_not_found() {
    let tmp = fixture_site();
    let (status, location, _) = get(
        fixture_app(tmp.path()),
        "/buying-guide/ivermectin-for-scabies-treatment-protocol-and-success-rates",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(location.is_none());
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let tmp = fixture_site();
    let (status, _, _) = get(fixture_app(tmp.path()), "/cooking/ivermectin-dosage-guide").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scheduled_article_is_not_found() {
    let tmp = fixture_site();
    let (status, _, _) = get(
        fixture_app(tmp.path()),
        "/buying-guide/ivermectin-price-guide-cost-comparison-by-source",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn newly_added_file_is_served_without_restart() {
    let tmp = fixture_site();
    let app = fixture_app(tmp.path());
    std::fs::write(
        tmp.path().join("content/ivermectin-dosage-for-humans-weight-chart.mdx"),
        "---\ntitle: \"Human Dosing\"\npublishedAt: \"2026-03-30\"\nsummary: \"Chart.\"\n---\n\nBody.\n",
    )
    .unwrap();
    let (status, _, body) = get(
        app,
        "/dosage-administration/ivermectin-dosage-for-humans-weight-chart",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Human Dosing"));
}

#[tokio::test]
async fn about_page_renders() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/about").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("About Ivermectin Research"));
}

#[tokio::test]
async fn images_are_served_from_assets() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/images/logo.svg").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<svg"));
}

// =========================================================================
// Documents
// =========================================================================

#[tokio::test]
async fn sitemap_has_one_entry_per_page() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/sitemap.xml").await;
    assert_eq!(status, StatusCode::OK);
    // seven published articles, five categories, the root
    assert_eq!(body.matches("<url>").count(), 7 + 6);
    assert!(!body.contains("ivermectin-price-guide"));
}

#[tokio::test]
async fn feed_is_rss() {
    let tmp = fixture_site();
    let (status, _, body) = get(fixture_app(tmp.path()), "/feed.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<rss version="2.0""#));
    assert_eq!(body.matches("<item>").count(), 7);
}

#[tokio::test]
async fn robots_and_llms_are_plain_text() {
    let tmp = fixture_site();
    let (status, _, robots) = get(fixture_app(tmp.path()), "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(robots.contains("Sitemap: "));
    let (status, _, llms) = get(fixture_app(tmp.path()), "/llms.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(llms.contains("## Medical Uses & Applications"));
}

// =========================================================================
// Indexing cron endpoint
// =========================================================================

#[tokio::test]
async fn cron_without_bearer_is_unauthorized() {
    let tmp = fixture_site();
    let indexer = Arc::new(RecordingIndexer::default());
    let app = site(tmp.path(), "2026-03-10", indexer.clone());
    let (status, _, body) = send(app, cron_request(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Unauthorized");
    assert!(indexer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cron_with_wrong_bearer_is_unauthorized() {
    let tmp = fixture_site();
    let indexer = Arc::new(RecordingIndexer::default());
    let app = site(tmp.path(), "2026-03-10", indexer.clone());
    let (status, _, _) = send(app, cron_request(Some("guess"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(indexer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cron_with_nothing_published_today_skips_service() {
    let tmp = fixture_site();
    let indexer = Arc::new(RecordingIndexer::default());
    let app = site(tmp.path(), "2026-04-01", indexer.clone());
    let (status, _, body) = send(app, cron_request(Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["indexed"], 0);
    assert_eq!(json["date"], "2026-04-01");
    assert_eq!(json["message"], "No articles published today");
    assert!(indexer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cron_submits_todays_articles() {
    let tmp = fixture_site();
    let indexer = Arc::new(RecordingIndexer::default());
    let app = site(tmp.path(), "2026-03-10", indexer.clone());
    let (status, _, body) = send(app, cron_request(Some(SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["indexed"], 2);
    assert_eq!(json["failed"], 0);
    let calls = indexer.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], "auth");
    assert!(calls.contains(&"https://ivermectintablets2026.com/ivermectin-dosage-guide".to_string()));
}

#[tokio::test]
async fn cron_authentication_failure_is_server_error() {
    let tmp = fixture_site();
    let indexer = Arc::new(RecordingIndexer {
        fail_auth: true,
        ..Default::default()
    });
    let app = site(tmp.path(), "2026-03-10", indexer);
    let (status, _, body) = send(app, cron_request(Some(SECRET))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["date"], "2026-03-10");
}

#[tokio::test]
async fn cron_without_configured_secret_rejects_all() {
    let tmp = fixture_site();
    let mut config = config(tmp.path());
    config.secrets.cron_secret = None;
    let app = app(AppState::with_indexer(config, Arc::new(RecordingIndexer::default())));
    let (status, _, _) = send(app, cron_request(Some(SECRET))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
