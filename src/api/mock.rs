//! Scripted transport for tests.

use super::{ApiError, ApiRequest, ApiResponse, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(ApiResponse),
    Fail(ApiError),
    Delay(Duration, ApiResponse),
    Hang,
}

/// Answers requests from a FIFO script, then falls back to `200 []`.
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, step: Scripted) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.push(Scripted::Respond(response(status, body)));
    }

    pub fn respond_after(&self, delay: Duration, status: u16, body: &str) {
        self.push(Scripted::Delay(delay, response(status, body)));
    }

    pub fn fail(&self, error: ApiError) {
        self.push(Scripted::Fail(error));
    }

    pub fn hang(&self) {
        self.push(Scripted::Hang);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

fn response(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::Respond(response(200, "[]")));

        match step {
            Scripted::Respond(resp) => Ok(resp),
            Scripted::Fail(err) => Err(err),
            Scripted::Delay(delay, resp) => {
                tokio::time::sleep(delay).await;
                Ok(resp)
            }
            Scripted::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
