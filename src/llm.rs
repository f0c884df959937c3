use serde::Serialize;
use reqwest::{Client, ClientBuilder};
use url::Url;
use crate::config::Config;
use crate::error::{Result, AppError};

pub const SYSTEM_PROMPT: &str = "Summarize the following webpage content briefly.";
pub const MAX_TOKENS: u32 = 150;
pub const TEMPERATURE: f32 = 0.3;

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct SummaryClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl SummaryClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build LLM client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.completions_url.clone(),
            api_key: config.groq_api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Sends `text` for summarization and returns the first choice's content.
    /// Single attempt; the response status is not inspected, only its body.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmError(e.to_string()))?;

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::LlmError(format!("Unreadable response body: {}", e)))?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))?
            .to_string();

        Ok(reply)
    }
}
