use crate::error::{MirrorError, Result};
use std::time::Duration;

/// Source of image bytes
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let network = |e: reqwest::Error| MirrorError::Network {
            url: url.to_string(),
            source: Box::new(e),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(network)?;
        let bytes = response.bytes().await.map_err(network)?;
        ::log::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Fetcher that retries failed downloads with exponential backoff
pub struct RetryingFetcher<F> {
    inner: F,
    retries: u32,
    backoff: Duration,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            retries,
            backoff,
        }
    }

    /// Pause before retry number `attempt + 1`, saturating for long runs
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.inner.get(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < self.retries => {
                    let backoff = self.delay(attempt);
                    attempt += 1;
                    ::log::warn!(
                        "Download of {} failed (attempt {}/{}): {}, backing off {:.1}s",
                        url,
                        attempt,
                        self.retries + 1,
                        e,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
