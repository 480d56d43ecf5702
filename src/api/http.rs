// reqwest-backed transport for the job service

use super::{ApiError, ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use reqwest::Client;

pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // No client-wide timeout: only the list refresh has a deadline, and
        // it is enforced by the caller.
        let client = Client::builder()
            .user_agent(concat!("subtitle-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("building HTTP client: {}", e)))?;

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        tracing::info!("HTTP transport initialized for {}", base_url);

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path);
        tracing::debug!("{:?} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("reading body: {}", e)))?;

        tracing::debug!("{} answered HTTP {} ({} bytes)", url, status, body.len());
        Ok(ApiResponse { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}
