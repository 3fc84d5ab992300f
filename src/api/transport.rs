//! JSON-over-HTTP transport to the backend

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::{ApiError, Endpoint};
use crate::config::Config;

/// Sends one JSON body to an endpoint and returns the decoded JSON reply
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: Endpoint, body: &Value) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    const ACCEPT_HEADER: &'static str = "application/json, text/plain, */*";

    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(Self::ACCEPT_HEADER));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    fn url_for(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        // paths are absolute, so join replaces any path on the base url
        self.base_url
            .join(endpoint.path())
            .map_err(|e| ApiError::Unavailable(format!("invalid url for {}: {}", endpoint, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: Endpoint, body: &Value) -> Result<Value, ApiError> {
        let url = self.url_for(endpoint)?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status_code: status.as_u16(),
                message: response_text,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| ApiError::decode(endpoint, e))
    }
}
