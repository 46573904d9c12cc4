//! Search-engine notification for newly published articles.
//!
//! Once a day the cron endpoint asks Google's Indexing API to crawl every
//! article whose publish date is today. The job:
//!
//! 1. selects today's articles; with none it stops without contacting
//!    Google at all, credentials included;
//! 2. authenticates once, exchanging a service-account signed JWT for a
//!    bearer token (failure aborts the job);
//! 3. submits each URL in turn, one request at a time, recording per-URL
//!    failures without stopping the batch. There are no retries.
//!
//! [`IndexingService`] is the seam between the job and the network so the
//! job logic is tested without HTTP, and [`GoogleIndexing`] is the real
//! client.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

use crate::config::{SiteConfig, UrlForm};
use crate::content::{self, Article};
use crate::pages;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Lifetime of the signed assertion. Google caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("GOOGLE_SERVICE_ACCOUNT_JSON environment variable not set")]
    MissingCredentials,
    #[error("Invalid service account JSON: {0}")]
    Credentials(#[from] serde_json::Error),
    #[error("Invalid service account key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token exchange failed: HTTP {status}: {body}")]
    TokenExchange { status: u16, body: String },
    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Content error: {0}")]
    Content(#[from] content::ContentError),
}

/// Bearer token returned by the token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

/// The external indexing service, reduced to the two calls the job makes.
#[async_trait]
pub trait IndexingService: Send + Sync {
    async fn authenticate(&self) -> Result<AccessToken, IndexingError>;
    async fn submit(&self, token: &AccessToken, url: &str) -> Result<(), IndexingError>;
}

/// Fields of a Google service-account key file the client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google Indexing API client.
///
/// Credentials are parsed on [`authenticate`](IndexingService::authenticate),
/// not at construction, so a day with nothing to submit never needs them.
pub struct GoogleIndexing {
    client: reqwest::Client,
    credentials: Option<String>,
    endpoint: String,
    scope: String,
}

impl GoogleIndexing {
    pub fn new(config: &SiteConfig) -> Result<Self, IndexingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.indexing.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            credentials: config.secrets.service_account_json.clone(),
            endpoint: config.indexing.endpoint.clone(),
            scope: config.indexing.scope.clone(),
        })
    }

    fn service_account(&self) -> Result<ServiceAccount, IndexingError> {
        let json = self
            .credentials
            .as_deref()
            .ok_or(IndexingError::MissingCredentials)?;
        Ok(serde_json::from_str(json)?)
    }

    /// RS256-signed assertion for the JWT bearer grant.
    fn assertion(&self, account: &ServiceAccount, now: i64) -> Result<String, IndexingError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = account.private_key_id.clone();
        let claims = AssertionClaims {
            iss: &account.client_email,
            scope: &self.scope,
            aud: &account.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}

#[async_trait]
impl IndexingService for GoogleIndexing {
    async fn authenticate(&self) -> Result<AccessToken, IndexingError> {
        let account = self.service_account()?;
        let assertion = self.assertion(&account, Utc::now().timestamp())?;

        let response = self
            .client
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexingError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }
        let token: TokenResponse = response.json().await?;
        Ok(AccessToken(token.access_token))
    }

    async fn submit(&self, token: &AccessToken, url: &str) -> Result<(), IndexingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&token.0)
            .json(&json!({ "url": url, "type": "URL_UPDATED" }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexingError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// An article selected for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedArticle {
    pub slug: String,
    pub published_at: NaiveDate,
    pub title: String,
}

/// Outcome of one URL submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Submission {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingReport {
    pub date: NaiveDate,
    pub articles: Vec<IndexedArticle>,
    /// One entry per submitted URL, in submission order.
    pub submissions: Vec<Submission>,
}

impl IndexingReport {
    pub fn indexed(&self) -> usize {
        self.submissions.iter().filter(|s| s.succeeded()).count()
    }

    pub fn failed(&self) -> Vec<&Submission> {
        self.submissions.iter().filter(|s| !s.succeeded()).collect()
    }

    /// Response body for the cron endpoint.
    pub fn to_json(&self) -> Value {
        let date = self.date.format("%Y-%m-%d").to_string();
        if self.articles.is_empty() {
            return json!({
                "success": true,
                "indexed": 0,
                "urls": [],
                "date": date,
                "message": "No articles published today",
            });
        }

        let failed = self.failed();
        let urls: Vec<&str> = self.submissions.iter().map(|s| s.url.as_str()).collect();
        let mut body = json!({
            "success": true,
            "indexed": self.indexed(),
            "failed": failed.len(),
            "urls": urls,
            "articles": self.articles,
            "date": date,
        });
        if !failed.is_empty()
            && let Some(obj) = body.as_object_mut()
        {
            obj.insert("failedUrls".into(), json!(failed));
        }
        body
    }
}

/// Response body for a job that could not run.
pub fn failure_json(error: &IndexingError, date: NaiveDate) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
        "date": date.format("%Y-%m-%d").to_string(),
    })
}

/// Public URL submitted for an article.
pub fn submission_url(config: &SiteConfig, article_slug: &str) -> String {
    match config.indexing.url_form {
        UrlForm::Legacy => config.site.url(&format!("/{article_slug}")),
        UrlForm::Canonical => config.site.url(&pages::canonical_path(article_slug)),
    }
}

/// Notify the service about every article published on `today`.
pub async fn run<S>(
    service: &S,
    config: &SiteConfig,
    articles: &[Article],
    today: NaiveDate,
) -> Result<IndexingReport, IndexingError>
where
    S: IndexingService + ?Sized,
{
    let todays = content::published_on(articles, today);
    tracing::info!(date = %today, count = todays.len(), "indexing run");

    let selected: Vec<IndexedArticle> = todays
        .iter()
        .map(|a| IndexedArticle {
            slug: a.slug.clone(),
            published_at: a.metadata.published_at,
            title: a.metadata.title.clone(),
        })
        .collect();

    if selected.is_empty() {
        return Ok(IndexingReport {
            date: today,
            articles: selected,
            submissions: Vec::new(),
        });
    }

    let token = service.authenticate().await?;

    let mut submissions = Vec::with_capacity(selected.len());
    for article in &selected {
        let url = submission_url(config, &article.slug);
        match service.submit(&token, &url).await {
            Ok(()) => {
                tracing::info!(%url, "indexed");
                submissions.push(Submission { url, error: None });
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "indexing failed");
                submissions.push(Submission {
                    url,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let report = IndexingReport {
        date: today,
        articles: selected,
        submissions,
    };
    tracing::info!(
        indexed = report.indexed(),
        submitted = report.submissions.len(),
        "indexing complete"
    );
    Ok(report)
}
