use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{HarvestError, Result};

// ─── Pacer ────────────────────────────────────────────────────────────────────

/// Politeness hook awaited before a request goes out.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait(&self);
}

/// Keeps at least `min_interval` between consecutive paced requests.
pub struct CrawlDelay {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl CrawlDelay {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Pacer for CrawlDelay {
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!(?remaining, "crawl delay");
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

// ─── HttpClient ───────────────────────────────────────────────────────────────

/// A fetched page. Non-success statuses are returned, not raised.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
}

impl Fetched {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &str) -> Result<Fetched> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Fetched { status, body })
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET bytes");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(HarvestError::UnexpectedStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Resolves `href` (absolute, protocol-relative or site-relative) against `base`.
pub fn resolve_url(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| HarvestError::InvalidUrl(format!("{base}: {e}")))?;
    base.join(href)
        .map(String::from)
        .map_err(|e| HarvestError::InvalidUrl(format!("{href}: {e}")))
}
