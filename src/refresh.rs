// Bounded-duration job list refresh

use crate::api::{ApiError, Job, JobClient};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REFRESH_DEADLINE: Duration = Duration::from_millis(5000);

/// Why a refresh came back empty.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshFailure {
    /// The deadline fired and the request was dropped
    TimedOut(Duration),
    Failed(ApiError),
}

impl RefreshFailure {
    pub fn describe(&self) -> String {
        match self {
            RefreshFailure::TimedOut(deadline) => {
                format!("request aborted after {} ms", deadline.as_millis())
            }
            RefreshFailure::Failed(err) => err.to_string(),
        }
    }
}

/// Result of a refresh. `jobs` is empty whenever `failure` is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefreshOutcome {
    pub jobs: Vec<Job>,
    pub failure: Option<RefreshFailure>,
}

impl RefreshOutcome {
    fn failed(failure: RefreshFailure) -> Self {
        Self {
            jobs: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct JobListSynchronizer {
    client: Arc<JobClient>,
    deadline: Duration,
}

impl JobListSynchronizer {
    pub fn new(client: Arc<JobClient>) -> Self {
        Self::with_deadline(client, DEFAULT_REFRESH_DEADLINE)
    }

    pub fn with_deadline(client: Arc<JobClient>, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Fetches the job list, giving up after the deadline.
    ///
    /// Always resolves. On timeout the in-flight request future is dropped,
    /// which aborts the underlying connection.
    pub async fn refresh(&self) -> RefreshOutcome {
        match tokio::time::timeout(self.deadline, self.client.list_jobs()).await {
            Ok(Ok(jobs)) => {
                tracing::info!("Job list refreshed: {} jobs", jobs.len());
                RefreshOutcome {
                    jobs,
                    failure: None,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Job list refresh failed: {}", e);
                RefreshOutcome::failed(RefreshFailure::Failed(e))
            }
            Err(_) => {
                tracing::warn!(
                    "Job list refresh timed out after {} ms",
                    self.deadline.as_millis()
                );
                RefreshOutcome::failed(RefreshFailure::TimedOut(self.deadline))
            }
        }
    }
}
