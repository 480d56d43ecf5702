use crate::api::{ApiError, Job, JobClient, Translation};
use crate::refresh::JobListSynchronizer;
use crate::subtitle::SubtitleFormat;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

pub mod export;
pub mod state;

pub use export::{DirectorySink, ExportError, FileSink, SubtitleFile};
pub use state::{transition, ControllerState, Effect, Event};

/// What a submit call ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input empty or another submission in flight; see `status_message`
    Skipped,
    Created(Job),
    Failed(String),
}

/// Drives the job screen: owns the state and runs the effects that
/// `state::transition` asks for.
///
/// Cheap to clone; clones share state. The state lock is never held across
/// an await.
#[derive(Clone)]
pub struct JobLifecycleController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<ControllerState>,
    client: Arc<JobClient>,
    synchronizer: JobListSynchronizer,
    sink: Arc<dyn FileSink>,
    export_format: SubtitleFormat,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl JobLifecycleController {
    pub fn new(
        client: Arc<JobClient>,
        synchronizer: JobListSynchronizer,
        sink: Arc<dyn FileSink>,
        export_format: SubtitleFormat,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ControllerState::default()),
                client,
                synchronizer,
                sink,
                export_format,
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.lock_state().clone()
    }

    /// First activation schedules exactly one refresh; later calls do nothing.
    pub async fn activate(&self) {
        self.drive(Event::Activated).await;
    }

    pub async fn set_input(&self, url: impl Into<String>) {
        self.drive(Event::InputChanged(url.into())).await;
    }

    /// Submits the current input. The follow-up refresh runs in the
    /// background and does not delay the return.
    pub async fn submit(&self) -> SubmitOutcome {
        match self.drive(Event::SubmitRequested).await {
            Some(Ok(job)) => SubmitOutcome::Created(job),
            Some(Err(detail)) => SubmitOutcome::Failed(detail),
            None => SubmitOutcome::Skipped,
        }
    }

    /// Manual refresh, awaited by the caller.
    pub async fn refresh(&self) {
        let outcome = self.inner.synchronizer.refresh().await;
        self.drive(Event::RefreshFinished(outcome)).await;
    }

    /// Waits for background refreshes started so far.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = {
                let mut guard = self
                    .inner
                    .background
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                guard.drain(..).collect()
            };
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    tracing::error!("Background refresh task failed: {}", e);
                }
            }
        }
    }

    /// Fetches the transcript and delivers it as `<job_id>.<ext>`.
    pub async fn download_transcript(&self, job_id: &str) -> Result<PathBuf, ExportError> {
        let file =
            export::build_subtitle_file(&self.inner.client, job_id, self.inner.export_format)
                .await?;
        self.inner.sink.deliver(&file)
    }

    pub async fn job_details(&self, job_id: &str) -> Result<Job, ApiError> {
        self.inner.client.get_job(job_id).await
    }

    pub async fn translation(&self, job_id: &str) -> Result<Translation, ApiError> {
        self.inner.client.fetch_translation(job_id).await
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: Event) -> Vec<Effect> {
        let mut state = self.lock_state();
        let (next, effects) = transition(&state, event);
        *state = next;
        effects
    }

    /// Feeds an event through the state machine and runs resulting effects
    /// until quiet. Returns the create result if a submission ran.
    async fn drive(&self, event: Event) -> Option<Result<Job, String>> {
        let mut queue = VecDeque::from([event]);
        let mut created = None;

        while let Some(event) = queue.pop_front() {
            for effect in self.dispatch(event) {
                match effect {
                    Effect::CreateJob(url) => {
                        let result = self.inner.client.create_job(&url).await;
                        match result {
                            Ok(job) => {
                                queue.push_back(Event::SubmitSucceeded(job.clone()));
                                created = Some(Ok(job));
                            }
                            Err(e) => {
                                tracing::warn!("Submission failed: {}", e);
                                let detail = e.to_string();
                                queue.push_back(Event::SubmitFailed(detail.clone()));
                                created = Some(Err(detail));
                            }
                        }
                    }
                    Effect::RefreshJobs => self.spawn_refresh(),
                }
            }
        }

        created
    }

    fn spawn_refresh(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = controller.inner.synchronizer.refresh().await;
            controller.dispatch(Event::RefreshFinished(outcome));
        });

        let mut background = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }
}
