use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use super::{MediaError, MediaHost, MediaItem};
use crate::config::MediaConfig;

/// Longest wait honoured from a rate-limit header.
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Client for the ImageKit file listing API (`GET /v1/files`).
///
/// Listings are paged with `skip`/`limit`. A 429 waits for as long as the
/// host asks (`Retry-After` or `X-RateLimit-Reset`) before retrying; 5xx and
/// connection failures back off linearly. Both are bounded by `max_retries`.
#[derive(Clone)]
pub struct ImageKitClient {
    http: reqwest::Client,
    files_url: Url,
    private_key: String,
    page_limit: u32,
    max_retries: u32,
    backoff: Duration,
}

impl ImageKitClient {
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let files_url = Url::parse(&format!("{}/files", config.api_url.trim_end_matches('/')))
            .map_err(|e| MediaError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            files_url,
            private_key: config.private_key.clone(),
            page_limit: config.page_limit.max(1),
            max_retries: config.max_retries.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn list(&self, path: &str, kind: &str, sort: Option<&str>) -> Result<Vec<MediaItem>, MediaError> {
        if self.private_key.is_empty() {
            return Err(MediaError::NotConfigured("IMAGEKIT_PRIVATE_KEY"));
        }

        let mut items = Vec::new();
        let mut skip = 0usize;
        loop {
            let page = self.fetch_page(path, kind, sort, skip).await?;
            let fetched = page.len();
            items.extend(page);
            if fetched < self.page_limit as usize {
                break;
            }
            skip += fetched;
        }

        debug!("Listed {} {} entries under {}", items.len(), kind, path);
        Ok(items)
    }

    async fn fetch_page(
        &self,
        path: &str,
        kind: &str,
        sort: Option<&str>,
        skip: usize,
    ) -> Result<Vec<MediaItem>, MediaError> {
        let mut attempt = 1;
        loop {
            let mut request = self
                .http
                .get(self.files_url.clone())
                .basic_auth(&self.private_key, Some(""))
                .query(&[("path", path), ("type", kind)])
                .query(&[("skip", skip), ("limit", self.page_limit as usize)]);
            if let Some(sort) = sort {
                request = request.query(&[("sort", sort)]);
            }

            let wait = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<Vec<MediaItem>>().await?);
                }
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    if attempt >= self.max_retries {
                        return Err(MediaError::RateLimited(attempt));
                    }
                    let wait = rate_limit_delay(response.headers()).unwrap_or(self.backoff * attempt);
                    warn!("Media host rate limited listing of {} (attempt {}), waiting {:?}", path, attempt, wait);
                    wait
                }
                Ok(response) if response.status().is_server_error() && attempt < self.max_retries => {
                    warn!("Media host returned {} for {} (attempt {})", response.status(), path, attempt);
                    self.backoff * attempt
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let mut message = response.text().await.unwrap_or_default();
                    message.truncate(200);
                    return Err(MediaError::Upstream { status, message });
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    warn!("Media host request for {} failed (attempt {}): {}", path, attempt, e);
                    self.backoff * attempt
                }
                Err(e) => return Err(e.into()),
            };

            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl MediaHost for ImageKitClient {
    async fn list_folders(&self, path: &str) -> Result<Vec<MediaItem>, MediaError> {
        self.list(path, "folder", None).await
    }

    async fn list_files(&self, path: &str, newest_first: bool) -> Result<Vec<MediaItem>, MediaError> {
        let sort = if newest_first { Some("DESC_CREATED") } else { None };
        self.list(path, "file", sort).await
    }
}

/// How long the host asked us to wait: `Retry-After` in seconds, or
/// ImageKit's `X-RateLimit-Reset` in milliseconds.
pub fn rate_limit_delay(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
    };

    let wait = header("retry-after")
        .map(Duration::from_secs)
        .or_else(|| header("x-ratelimit-reset").map(Duration::from_millis))?;
    Some(wait.min(MAX_RATE_LIMIT_WAIT))
}
