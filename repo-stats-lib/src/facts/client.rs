//! GitHub API client
//!
//! Minimal REST client for the handful of endpoints needed to describe a repository.

use super::{RepoRef, RepositoryApi};
use crate::Result;
use chrono::{DateTime, FixedOffset, Utc};
use ohno::{EnrichableExt, app_err};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "    client";

/// Default GitHub REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repository descriptor as reported by `GET /repos/{owner}/{repo}`
///
/// Everything is optional so that a sparse response still deserializes; the reducer decides
/// which fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: Option<String>,
    pub forks: Option<u64>,
    pub stargazers_count: Option<u64>,
    /// Issues and pull requests together
    pub open_issues: Option<u64>,
    pub license: Option<License>,
    pub language: Option<String>,
    /// Timestamps keep the offset they were reported with
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub pushed_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct License {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchCount {
    total_count: u64,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a single API call
#[derive(Debug)]
pub enum ApiResult<T> {
    /// Request succeeded
    Success(T),

    /// Rate limited until the reset time
    RateLimited(RateLimitInfo),

    /// The requested resource was not found (404), or has nothing to report (409/422)
    NotFound,

    /// Request failed
    Failed(ohno::AppError),
}

/// Connection settings for the API client, built once per run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Option<String>,
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl Client {
    /// Create a new client from the connection settings
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("repo-stats/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        // Validate up front so every later URL join is infallible in practice
        let _ = Url::parse(&config.base_url).map_err(|e| app_err!("invalid API base URL '{}': {e}", config.base_url))?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an API call and classify the result
    pub async fn api_call(&self, url: &Url) -> ApiResult<reqwest::Response> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = match self.client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e.into()),
        };

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        if let Some(rl) = &rate_limit {
            log::debug!(target: LOG_TARGET, "{} request(s) remaining until {}", rl.remaining, rl.reset_at.format("%T"));
        }

        let status = resp.status();
        if status.is_success() {
            return ApiResult::Success(resp);
        }

        // 429 is always a rate limit, 403 only when the quota is exhausted
        let exhausted = rate_limit.is_some_and(|rl| rl.remaining == 0);
        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
            let rate_limit = rate_limit.unwrap_or_else(|| RateLimitInfo {
                remaining: 0,
                reset_at: Utc::now() + chrono::Duration::hours(1),
            });
            return ApiResult::RateLimited(rate_limit);
        }

        if matches!(status, StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY) {
            return ApiResult::NotFound;
        }

        ApiResult::Failed(app_err!("HTTP {status} from {url}"))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let full = format!("{}{path}", self.base_url);
        Url::parse(&full).map_err(|e| app_err!("invalid API URL '{full}': {e}"))
    }

    fn repo_endpoint(&self, repo: &RepoRef, suffix: &str) -> Result<Url> {
        self.endpoint(&format!("/repos/{}/{}{suffix}", repo.owner(), repo.name()))
    }

    /// Fetch a JSON document, treating anything but success as a failure.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let resp = into_response(self.api_call(url).await, url)?;
        resp.json().await.map_err(|e| ohno::AppError::from(e).enrich(format!("decoding response from {url}")))
    }

    /// Count the entries on the first page of a listing.
    async fn first_page_len(&self, mut url: Url, per_page: u8) -> Result<u64> {
        let _ = url.query_pairs_mut().append_pair("per_page", &per_page.to_string());

        let resp = into_response(self.api_call(&url).await, &url)?;

        // Listings of empty repositories answer with no content
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(0);
        }

        let items: Vec<IgnoredAny> = resp
            .json()
            .await
            .map_err(|e| ohno::AppError::from(e).enrich(format!("decoding response from {url}")))?;
        Ok(items.len() as u64)
    }
}

impl RepositoryApi for Client {
    async fn repository(&self, repo: &RepoRef) -> Result<RepositoryDescriptor> {
        let url = self.repo_endpoint(repo, "")?;
        self.get_json(&url).await
    }

    async fn contributor_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        let url = self.repo_endpoint(repo, "/contributors")?;
        self.first_page_len(url, per_page).await
    }

    async fn open_pull_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        let mut url = self.repo_endpoint(repo, "/pulls")?;
        let _ = url.query_pairs_mut().append_pair("state", "open");
        self.first_page_len(url, per_page).await
    }

    async fn branch_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        let url = self.repo_endpoint(repo, "/branches")?;
        self.first_page_len(url, per_page).await
    }

    async fn search_count(&self, query: &str) -> Result<u64> {
        let mut url = self.endpoint("/search/issues")?;
        let _ = url.query_pairs_mut().append_pair("q", query).append_pair("per_page", "1");
        let count: SearchCount = self.get_json(&url).await?;
        Ok(count.total_count)
    }

    async fn commit_count(&self, repo: &RepoRef, branch: &str) -> Result<Option<u64>> {
        let mut url = self.repo_endpoint(repo, "/commits")?;
        let _ = url.query_pairs_mut().append_pair("sha", branch).append_pair("per_page", "1");

        let resp = match self.api_call(&url).await {
            ApiResult::Success(resp) => resp,
            ApiResult::NotFound => return Ok(None),
            other => return into_response(other, &url).map(|_| None),
        };

        // With one commit per page, the number of the last page is the number of commits
        if let Some(last) = last_page_from_link(resp.headers()) {
            return Ok(Some(last));
        }

        let commits: Vec<IgnoredAny> = resp
            .json()
            .await
            .map_err(|e| ohno::AppError::from(e).enrich(format!("decoding response from {url}")))?;
        Ok(Some(commits.len() as u64))
    }
}

/// Turn a classified API result into the response, or an error describing why there is none.
fn into_response(result: ApiResult<reqwest::Response>, url: &Url) -> Result<reqwest::Response> {
    match result {
        ApiResult::Success(resp) => Ok(resp),
        ApiResult::RateLimited(rl) => Err(app_err!(
            "rate limited by the API until {} ({url})",
            rl.reset_at.with_timezone(&chrono::Local).format("%T")
        )),
        ApiResult::NotFound => Err(app_err!("not found: {url}")),
        ApiResult::Failed(e) => Err(e),
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}

/// Extract the `page` number of the `rel="last"` entry of a `Link` header
fn last_page_from_link(headers: &HeaderMap) -> Option<u64> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == r#"rel="last""#) {
            return None;
        }

        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs().find(|(k, _)| k == "page").and_then(|(_, v)| v.parse().ok())
    })
}
