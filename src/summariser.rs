use std::time::Instant;
use tracing::{debug, info};
use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_text;
use crate::fetcher::PageFetcher;
use crate::llm::SummaryClient;

/// The fetch, extract, summarize chain behind a single user action.
#[derive(Clone)]
pub struct Summariser {
    fetcher: PageFetcher,
    llm: SummaryClient,
}

impl Summariser {
    pub fn new(fetcher: PageFetcher, llm: SummaryClient) -> Self {
        Self { fetcher, llm }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(PageFetcher::new(config)?, SummaryClient::new(config)?))
    }

    pub async fn summarize_url(&self, url: &str) -> Result<String> {
        let start = Instant::now();

        let html = self.fetcher.fetch_page(url).await?;
        debug!(url, bytes = html.len(), elapsed = ?start.elapsed(), "page fetched through proxy");

        let text = extract_text(&html);
        debug!(url, chars = text.chars().count(), "extracted page text");

        let llm_start = Instant::now();
        let summary = self.llm.summarize(&text).await?;
        info!(
            url,
            llm_elapsed = ?llm_start.elapsed(),
            elapsed = ?start.elapsed(),
            "summary received"
        );

        Ok(summary)
    }
}
