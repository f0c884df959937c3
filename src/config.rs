use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use crate::error::{AppError, Result};

pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_FETCH_RETRIES: u32 = 2;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_api_key: String,
    pub proxy_url: Url,
    pub completions_url: Url,
    pub model: String,
    pub fetch_retries: u32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for everything except the API key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq_api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("GROQ_API_KEY is not set".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let proxy_url = parse_url("PROXY_URL", lookup("PROXY_URL").as_deref().unwrap_or(DEFAULT_PROXY_URL))?;
        let completions_url = parse_url(
            "COMPLETIONS_URL",
            lookup("COMPLETIONS_URL").as_deref().unwrap_or(DEFAULT_COMPLETIONS_URL),
        )?;

        let model = lookup("SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let fetch_retries = match lookup("FETCH_RETRIES") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| AppError::ConfigError(format!("Invalid FETCH_RETRIES: {}", e)))?,
            None => DEFAULT_FETCH_RETRIES,
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::ConfigError(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?,
            None => 30,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key,
            proxy_url,
            completions_url,
            model,
            fetch_retries,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "secret")])).unwrap();

        assert_eq!(config.groq_api_key, "secret");
        assert_eq!(config.server_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.proxy_url.as_str(), DEFAULT_PROXY_URL);
        assert_eq!(config.completions_url.as_str(), DEFAULT_COMPLETIONS_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.fetch_retries, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("PROXY_URL", "http://localhost:9000/raw"),
            ("FETCH_RETRIES", "5"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.proxy_url.as_str(), "http://localhost:9000/raw");
        assert_eq!(config.fetch_retries, 5);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "k"), ("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("Invalid port"));
    }
}
