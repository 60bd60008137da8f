//! Transport trait for the predictions service, plus a scripted mock.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{JobId, JobRecord};
use crate::error::{Result, RetouchError};

/// Low-level access to the predictions service.
///
/// One implementation speaks HTTP ([`ReplicateClient`](crate::api::ReplicateClient));
/// [`MockPredictionsApi`] replays scripted responses for tests.
#[async_trait]
pub trait PredictionsApi: Send + Sync {
    /// Create a new prediction job from a prepared request body.
    async fn create_prediction(&self, body: Value) -> Result<JobRecord>;

    /// Fetch the current status snapshot for a job.
    async fn get_prediction(&self, id: &JobId) -> Result<JobRecord>;
}

/// Scripted in-memory implementation of [`PredictionsApi`].
///
/// Responses are consumed front-to-back; running out of scripted responses
/// is reported as an error so tests fail loudly on unexpected extra calls.
#[derive(Default)]
pub struct MockPredictionsApi {
    create_responses: Mutex<VecDeque<Result<JobRecord>>>,
    status_responses: Mutex<VecDeque<Result<JobRecord>>>,
    create_calls: AtomicUsize,
    status_calls: AtomicUsize,
    bodies: Mutex<Vec<Value>>,
}

impl MockPredictionsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `create_prediction` call.
    pub fn queue_create(&self, response: Result<JobRecord>) {
        self.create_responses.lock().unwrap().push_back(response);
    }

    /// Queue a response for the next `get_prediction` call.
    pub fn queue_status(&self, response: Result<JobRecord>) {
        self.status_responses.lock().unwrap().push_back(response);
    }

    /// Queue `count` copies of the same status snapshot.
    pub fn queue_status_times(&self, record: JobRecord, count: usize) {
        let mut queue = self.status_responses.lock().unwrap();
        for _ in 0..count {
            queue.push_back(Ok(record.clone()));
        }
    }

    /// Number of `create_prediction` calls made so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_prediction` calls made so far.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Request bodies captured from `create_prediction` calls.
    pub fn captured_bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionsApi for MockPredictionsApi {
    async fn create_prediction(&self, body: Value) -> Result<JobRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(body);
        self.create_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RetouchError::Submission(
                    "mock: no scripted create response".to_string(),
                ))
            })
    }

    async fn get_prediction(&self, _id: &JobId) -> Result<JobRecord> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RetouchError::Poll(
                    "mock: no scripted status response".to_string(),
                ))
            })
    }
}
