// Job service wire types and error definitions

use crate::subtitle::SubtitleSegment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Processing state reported by the service.
///
/// The client only ever observes these; unknown values are carried through
/// untouched as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            // The service writes "error" when a pipeline stage fails
            "failed" | "error" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A submitted video ("Video" on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(rename = "youtube_url", default)]
    pub source_url: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub status: JobStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "update_at", deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Transcription result for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub video_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub transcript_srt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub segments: Vec<SubtitleSegment>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transcript {
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: String,
    pub transcript_id: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    #[serde(default)]
    pub translated_srt: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Errors raised by `JobClient` and the transports behind it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {status}")]
    Remote { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// True when the service could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Timestamps are informational; a bad one should not sink the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
    }))
}
