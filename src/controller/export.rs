// Transcript export: fetch, encode, hand off to a file sink

use crate::api::{ApiError, JobClient};
use crate::subtitle::SubtitleFormat;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not fetch transcript: {0}")]
    Fetch(#[from] ApiError),

    #[error("No subtitle data for this job yet")]
    EmptyContent,

    #[error("'{0}' cannot be used as a file name")]
    InvalidJobId(String),

    #[error("Could not save file: {0}")]
    Delivery(String),
}

/// A finished subtitle file ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Receives exported files; the terminal build writes them to disk.
pub trait FileSink: Send + Sync {
    fn deliver(&self, file: &SubtitleFile) -> Result<PathBuf, ExportError>;
}

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn deliver(&self, file: &SubtitleFile) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ExportError::Delivery(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(&file.file_name);
        fs::write(&path, &file.contents)
            .map_err(|e| ExportError::Delivery(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            file.mime_type,
            file.contents.len()
        );
        Ok(path)
    }
}

/// Builds the subtitle file for a job. Zero segments is `EmptyContent`.
pub async fn build_subtitle_file(
    client: &JobClient,
    job_id: &str,
    format: SubtitleFormat,
) -> Result<SubtitleFile, ExportError> {
    let job_id = job_id.trim();
    if !is_plain_file_stem(job_id) {
        return Err(ExportError::InvalidJobId(job_id.to_string()));
    }

    let transcript = client.fetch_transcript(job_id).await?;

    if !transcript.has_segments() {
        tracing::info!("Transcript for job {} has no segments, nothing to export", job_id);
        return Err(ExportError::EmptyContent);
    }

    let malformed = transcript
        .segments
        .iter()
        .filter(|seg| !seg.is_well_formed())
        .count();
    if malformed > 0 {
        tracing::warn!(
            "Transcript for job {} has {} segments with bad timing, exporting as-is",
            job_id,
            malformed
        );
    }

    Ok(SubtitleFile {
        file_name: format!("{}.{}", job_id, format.extension()),
        mime_type: format.mime_type(),
        contents: format.encode(&transcript.segments),
    })
}

/// The id must name a single file inside the export directory.
fn is_plain_file_stem(job_id: &str) -> bool {
    !job_id.contains(['/', '\\'])
        && Path::new(job_id).file_name().map_or(false, |name| name == job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use std::sync::Arc;

    #[test]
    fn test_job_id_must_be_a_plain_file_stem() {
        assert!(is_plain_file_stem("job-1"));
        assert!(is_plain_file_stem("6f1c.e2"));
        assert!(!is_plain_file_stem("../x"));
        assert!(!is_plain_file_stem("a/b"));
        assert!(!is_plain_file_stem("a\\b"));
        assert!(!is_plain_file_stem(".."));
        assert!(!is_plain_file_stem("/etc/passwd"));
    }

    #[tokio::test]
    async fn test_path_like_job_id_is_rejected_before_fetch() {
        let transport = Arc::new(MockTransport::new());
        let client = JobClient::new(transport.clone());

        let err = build_subtitle_file(&client, "../x", SubtitleFormat::Srt)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::InvalidJobId(ref id) if id == "../x"));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));
        let file = SubtitleFile {
            file_name: "job-1.srt".to_string(),
            mime_type: "text/plain",
            contents: "1\n00:00:00,000 --> 00:00:01,500\nhi\n\n".to_string(),
        };

        let path = sink.deliver(&file).unwrap();

        assert_eq!(path, dir.path().join("exports").join("job-1.srt"));
        assert_eq!(fs::read_to_string(path).unwrap(), file.contents);
    }

    #[test]
    fn test_directory_sink_reports_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let sink = DirectorySink::new(&blocker);
        let file = SubtitleFile {
            file_name: "job-1.srt".to_string(),
            mime_type: "text/plain",
            contents: String::new(),
        };

        assert!(matches!(sink.deliver(&file), Err(ExportError::Delivery(_))));
    }
}
