// Job service client: request construction and response validation

mod http;
#[cfg(test)]
pub(crate) mod mock;
mod types;

pub use http::HttpTransport;
pub use types::{ApiError, Job, JobStatus, Transcript, Translation};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single request against the service, relative to its base address.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request to the service and back. No retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;

    /// Used in log lines
    fn name(&self) -> &str;
}

/// REST operations on the job service.
///
/// Each call is exactly one exchange through the transport. The list call is
/// tolerant of a non-array payload; the single-resource calls are strict and
/// surface whatever went wrong.
pub struct JobClient {
    transport: Arc<dyn Transport>,
}

impl JobClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST /videos`. Blank URLs are rejected before any I/O.
    pub async fn create_job(&self, url: &str) -> Result<Job, ApiError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ApiError::Validation("video URL is empty".to_string()));
        }

        tracing::info!("Submitting job via {}: {}", self.transport.name(), url);
        let response = self
            .transport
            .execute(ApiRequest::post("/videos", json!({ "youtube_url": url })))
            .await?;

        let job: Job = parse_success(response)?;
        tracing::info!("Job created: id={}, status={}", job.id, job.status.as_str());
        Ok(job)
    }

    /// `GET /videos`. A body that is valid JSON but not an array counts as no jobs.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response = self.transport.execute(ApiRequest::get("/videos")).await?;
        let value: Value = parse_success(response)?;

        if !value.is_array() {
            tracing::warn!("Job list payload is not an array, treating as empty: {}", value);
            return Ok(Vec::new());
        }

        let jobs: Vec<Job> = serde_json::from_value(value)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        tracing::debug!("Listed {} jobs", jobs.len());
        Ok(jobs)
    }

    /// `GET /videos/{id}`
    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let path = resource_path(job_id, "")?;
        let response = self.transport.execute(ApiRequest::get(path)).await?;
        parse_success(response)
    }

    /// `GET /videos/{id}/transcript`
    pub async fn fetch_transcript(&self, job_id: &str) -> Result<Transcript, ApiError> {
        let path = resource_path(job_id, "/transcript")?;
        let response = self.transport.execute(ApiRequest::get(path)).await?;
        let transcript: Transcript = parse_success(response)?;
        tracing::info!(
            "Fetched transcript {} for job {}: {} segments",
            transcript.id,
            job_id,
            transcript.segments.len()
        );
        Ok(transcript)
    }

    /// `GET /videos/{id}/translation`
    pub async fn fetch_translation(&self, job_id: &str) -> Result<Translation, ApiError> {
        let path = resource_path(job_id, "/translation")?;
        let response = self.transport.execute(ApiRequest::get(path)).await?;
        parse_success(response)
    }
}

fn resource_path(job_id: &str, suffix: &str) -> Result<String, ApiError> {
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(ApiError::Validation("job id is empty".to_string()));
    }
    Ok(format!("/videos/{}{}", urlencoding::encode(job_id), suffix))
}

fn parse_success<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        tracing::warn!("Service answered HTTP {}: {}", response.status, response.body);
        return Err(ApiError::Remote {
            status: response.status,
            body: response.body,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}
