//! Pure state transitions for the job screen.
//!
//! `transition` never performs I/O. It returns the next state plus the
//! effects the driver must run; the driver feeds results back in as events.

use crate::api::Job;
use crate::refresh::{RefreshFailure, RefreshOutcome};

pub const MSG_ENTER_URL: &str = "Please enter a video URL";
pub const MSG_SUBMITTING: &str = "Processing...";
pub const MSG_CONNECTIVITY: &str = "Could not load jobs. Check the connection to the server.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    pub input_url: String,
    pub submitting: bool,
    pub status_message: String,
    pub jobs: Vec<Job>,
    /// Set while the last refresh failed; separate from `status_message`
    pub list_notice: Option<String>,
    pub activated: bool,
}

impl ControllerState {
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Activated,
    InputChanged(String),
    SubmitRequested,
    SubmitSucceeded(Job),
    SubmitFailed(String),
    RefreshFinished(RefreshOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateJob(String),
    RefreshJobs,
}

pub fn transition(state: &ControllerState, event: Event) -> (ControllerState, Vec<Effect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        Event::Activated => {
            if !next.activated {
                next.activated = true;
                effects.push(Effect::RefreshJobs);
            }
        }
        Event::InputChanged(url) => {
            // Input is locked while a submission is in flight
            if !next.submitting {
                next.input_url = url;
            }
        }
        Event::SubmitRequested => {
            if next.submitting {
                // second submit while one is in flight: disabled
            } else if next.input_url.trim().is_empty() {
                next.status_message = MSG_ENTER_URL.to_string();
            } else {
                next.submitting = true;
                next.status_message = MSG_SUBMITTING.to_string();
                effects.push(Effect::CreateJob(next.input_url.clone()));
            }
        }
        Event::SubmitSucceeded(job) => {
            next.submitting = false;
            next.input_url.clear();
            next.status_message = format!("Transcription started! ID: {}", job.id);
            effects.push(Effect::RefreshJobs);
        }
        Event::SubmitFailed(detail) => {
            next.submitting = false;
            next.status_message = format!("An error occurred: {}", detail);
        }
        Event::RefreshFinished(outcome) => {
            next.jobs = outcome.jobs;
            next.list_notice = outcome.failure.as_ref().map(connectivity_notice);
        }
    }

    (next, effects)
}

fn connectivity_notice(failure: &RefreshFailure) -> String {
    tracing::debug!("Folding refresh failure into notice: {}", failure.describe());
    MSG_CONNECTIVITY.to_string()
}
