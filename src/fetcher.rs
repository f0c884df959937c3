use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use crate::config::Config;
use crate::error::{AppError, Result};

/// Fetches pages through the CORS proxy, retrying failed attempts immediately.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    proxy_endpoint: Url,
    retries: u32,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            proxy_endpoint: config.proxy_url.clone(),
            retries: config.fetch_retries,
        })
    }

    /// The proxy address that relays `target`, with `target` percent-encoded
    /// into the `url` query parameter.
    pub fn proxy_url(&self, target: &str) -> Url {
        let mut url = self.proxy_endpoint.clone();
        // Form encoding: spaces go out as `+` and `!'()*` are escaped, unlike
        // `encodeURIComponent`. The proxy decodes both to the same target.
        url.query_pairs_mut().append_pair("url", target);
        url
    }

    pub async fn fetch_page(&self, target: &str) -> Result<String> {
        let url = self.proxy_url(target);
        self.fetch_with_retry(url.as_str(), self.retries).await
    }

    /// GETs `url` up to `retries` times. Failures before the last attempt are
    /// dropped; the last one is returned.
    pub async fn fetch_with_retry(&self, url: &str, retries: u32) -> Result<String> {
        let mut last_error = None;

        for attempt in 1..=retries {
            match self.fetch_once(url).await {
                Ok(body) => {
                    debug!(url, attempt, bytes = body.len(), "fetched page");
                    return Ok(body);
                }
                Err(err) => {
                    if attempt < retries {
                        warn!(url, attempt, error = %err, "fetch failed, retrying");
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::FetchError("failed after retries".to_string())))
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!("HTTP {}", status.as_u16())));
        }
        let html = response.text().await?;
        Ok(html)
    }
}
