//! Centralized configuration management for ridehail

use anyhow::{Context, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL; endpoint paths are joined onto it
    pub base_url: String,
    /// File the TUI writes its log to
    pub log_file: PathBuf,
    /// How long the TUI waits for a key before checking background results
    pub tick_ms: u64,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "ridehail/0.1.0".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("RIDEHAIL_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let log_file = std::env::var("RIDEHAIL_LOG_FILE")
            .unwrap_or_else(|_| "./ridehail.log".to_string())
            .into();

        let http = HttpConfig {
            timeout_seconds: parse_env_var("RIDEHAIL_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("RIDEHAIL_USER_AGENT")
                .unwrap_or_else(|_| "ridehail/0.1.0".to_string()),
        };

        Ok(Config {
            base_url,
            log_file,
            tick_ms: parse_env_var("RIDEHAIL_TICK_MS")?.unwrap_or(100),
            http,
        })
    }

    /// Parsed backend base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid backend base URL: {}", self.base_url))
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get event poll interval as Duration
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Directory holding the log file
    pub fn log_dir(&self) -> PathBuf {
        match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// File name part of the log path
    pub fn log_file_name(&self) -> PathBuf {
        self.log_file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ridehail.log"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "Backend base URL must be http or https: {}",
                self.base_url
            ));
        }

        let log_dir = self.log_dir();
        if !log_dir.exists() {
            return Err(anyhow::anyhow!(
                "Log directory does not exist: {}",
                log_dir.display()
            ));
        }

        if self.tick_ms == 0 {
            return Err(anyhow::anyhow!("RIDEHAIL_TICK_MS must be greater than zero"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
