use crate::domain::ports::{ProviderError, ProviderResult};
use crate::utils::error::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin reqwest wrapper owned by one adapter.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    source: &'static str,
}

impl ApiClient {
    pub fn new(
        source: &'static str,
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("neighborhood-insights/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            source,
        })
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 取得 API key，未設定時回傳 NotConfigured
    pub fn api_key(&self) -> ProviderResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(format!("no API key configured for {}", self.source))
        })
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Sends the request and decodes a JSON body, mapping HTTP failures onto `ProviderError`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ProviderResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("{} request failed: {}", self.source, e)))?;

        let status = response.status();
        tracing::debug!(source = self.source, %status, "API response status");

        if let Some(error) = status_error(self.source, status) {
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("{} body read failed: {}", self.source, e)))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::MalformedResponse(format!("{} returned undecodable JSON: {}", self.source, e))
        })
    }
}

pub fn status_error(source: &str, status: StatusCode) -> Option<ProviderError> {
    if status.is_success() {
        return None;
    }

    let message = format!("{} responded with {}", source, status);
    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::NotConfigured(message),
        _ => ProviderError::Network(message),
    })
}
