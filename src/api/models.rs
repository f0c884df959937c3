use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::session::Session;

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub status: String,
    pub summary: String,
    pub html: String,
    pub summarized_at: DateTime<Utc>,
}

impl SummarizeResponse {
    pub fn from_session(session: &Session) -> Self {
        SummarizeResponse {
            url: session.url().to_string(),
            status: session.state().label().to_string(),
            summary: session.summary().unwrap_or_default().to_string(),
            html: session.summary_html().unwrap_or_default(),
            summarized_at: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct StateResponse {
    pub url: String,
    pub state: String,
    pub can_submit: bool,
    pub summary: Option<String>,
    pub rendered: String,
}

impl StateResponse {
    pub fn from_session(session: &Session) -> Self {
        StateResponse {
            url: session.url().to_string(),
            state: session.state().label().to_string(),
            can_submit: session.can_submit(),
            summary: session.summary().map(str::to_string),
            rendered: session.render(),
        }
    }
}
