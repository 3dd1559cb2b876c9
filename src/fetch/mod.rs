// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::FetchError;

/// Anything that can turn a URL into a page body.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// reqwest-backed source with retry and exponential backoff.
pub struct HttpSource {
    client: Client,
    max_retries: u32,
    backoff_ms: u64,
}

impl HttpSource {
    pub fn new(cfg: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(cfg.timeout())
            .gzip(true)
            .cookie_store(true)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            max_retries: cfg.max_retries,
            backoff_ms: cfg.backoff_ms,
        })
    }

    async fn get_text_core(&self, url: &Url) -> Result<String, FetchError> {
        debug!("Fetching text from {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

/// Transport errors, server errors and rate limiting are worth another try.
fn is_retryable(err: &FetchError) -> bool {
    match err {
        FetchError::Transport { .. } | FetchError::Body { .. } => true,
        FetchError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        FetchError::Other(_) => false,
    }
}

/// Delay before retry number `attempt` (1-based), doubling from `backoff_ms`.
fn backoff_delay(backoff_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(backoff_ms.saturating_mul(factor))
}

/// Run `op` until it succeeds, fails for good, or `max_retries` extra
/// attempts are spent.
pub async fn with_retry<F, Fut>(
    url: &Url,
    max_retries: u32,
    backoff_ms: u64,
    mut op: F,
) -> Result<String, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
{
    let mut attempts = 0;
    loop {
        match op().await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries && is_retryable(&e) => {
                attempts += 1;
                let delay = backoff_delay(backoff_ms, attempts);
                warn!(%url, attempt = attempts, delay_ms = delay.as_millis() as u64, error = %e, "Retrying");
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        with_retry(url, self.max_retries, self.backoff_ms, || self.get_text_core(url)).await
    }
}

/// One logical fetch: log, fetch, then pause whatever the outcome.
pub async fn fetch_html<S: PageSource>(
    source: &S,
    url: &Url,
    pause: Duration,
) -> Result<String, FetchError> {
    info!("Fetching: {}", url);
    let res = source.fetch(url).await;
    if let Err(e) = &res {
        error!(%url, error = %e, "request failed");
    }
    if !pause.is_zero() {
        sleep(pause).await;
    }
    res
}
