//! The user-facing state: the URL being typed and what the summary area shows.

use tracing::error;
use url::Url;
use crate::error::{AppError, Result};
use crate::format::format_summary;
use crate::summariser::Summariser;

/// Shown instead of any error detail when the chain fails.
pub const FAILURE_MESSAGE: &str = "Failed to summarize the provided URL.";

pub const LOADER_HTML: &str = "<div class=\"loader-container\">\n<div class=\"spinner\"></div>\n<p class=\"loader-text\">Summarizing, please wait...</p>\n</div>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Summary(String),
    Failed,
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Summary(text) => text,
            Outcome::Failed => FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Settled(Outcome),
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Settled(Outcome::Summary(_)) => "summarized",
            ViewState::Settled(Outcome::Failed) => "failed",
        }
    }
}

/// Non-blank, parseable, and `http` or `https`.
pub fn is_valid_url(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }

    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[derive(Debug, Default)]
pub struct Session {
    url: String,
    state: ViewState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Replaces the input URL. The input is locked while a request runs.
    pub fn set_url(&mut self, url: impl Into<String>) {
        if !self.is_loading() {
            self.url = url.into();
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && is_valid_url(&self.url)
    }

    /// Enters `Loading`, clearing any previous summary, and hands back the
    /// URL to summarize.
    pub fn begin(&mut self) -> Result<String> {
        if self.is_loading() {
            return Err(AppError::Busy);
        }
        if !is_valid_url(&self.url) {
            return Err(AppError::InvalidUrl(self.url.clone()));
        }

        self.state = ViewState::Loading;
        Ok(self.url.clone())
    }

    pub fn settle(&mut self, result: Result<String>) {
        let outcome = match result {
            Ok(summary) => Outcome::Summary(summary),
            Err(err) => {
                error!(url = %self.url, error = %err, "summarization failed");
                Outcome::Failed
            }
        };
        self.state = ViewState::Settled(outcome);
    }

    /// Runs one full request. `Loading` never outlives this future, even if
    /// it is dropped before completion.
    pub async fn run(&mut self, summariser: &Summariser) -> Result<()> {
        let url = self.begin()?;
        let guard = LoadingGuard { session: self };
        let result = summariser.summarize_url(&url).await;
        guard.session.settle(result);
        Ok(())
    }

    /// Raw text of the summary area, exactly as stored.
    pub fn summary(&self) -> Option<&str> {
        match &self.state {
            ViewState::Settled(outcome) => Some(outcome.text()),
            _ => None,
        }
    }

    /// Formatted summary markup, absent while idle, loading, or when the
    /// model returned nothing.
    pub fn summary_html(&self) -> Option<String> {
        self.summary()
            .filter(|text| !text.is_empty())
            .map(format_summary)
    }

    pub fn render(&self) -> String {
        if self.is_loading() {
            return LOADER_HTML.to_string();
        }
        match self.summary_html() {
            Some(html) => format!("<div class=\"summary\">\n{}\n</div>", html),
            None => String::new(),
        }
    }
}

struct LoadingGuard<'a> {
    session: &'a mut Session,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.session.is_loading() {
            self.session
                .settle(Err(AppError::FetchError("request abandoned".to_string())));
        }
    }
}
