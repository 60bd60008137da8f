//! Status polling - drives a submitted job to a terminal outcome.
//!
//! The poller issues strictly sequential status checks at a fixed interval
//! until the job reaches a terminal state or the attempt budget runs out.
//! A transport-level failure aborts immediately: it means the polling
//! channel itself is broken, not that the job failed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::api::PredictionsApi;
use crate::domain::{ArtifactRef, JobId, JobRecord, JobStatus};
use crate::error::{Result, RetouchError};

/// Shared flag that stops a poll loop before its next sleep.
///
/// Canceling only abandons the client-side wait; the remote job may keep
/// running server-side.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration for the poll loop.
///
/// The timeout is an attempt-count ceiling, not a wall-clock deadline:
/// worst-case elapsed time is roughly `max_attempts * interval`. Fixed
/// pacing is deliberate - one human-driven job does not need backoff.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between consecutive status checks
    pub interval: Duration,
    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 60,
        }
    }
}

/// Polls a job until it reaches a terminal state.
pub struct JobPoller<A: PredictionsApi> {
    api: Arc<A>,
    config: PollerConfig,
}

impl<A: PredictionsApi> JobPoller<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            config: PollerConfig::default(),
        }
    }

    pub fn with_config(api: Arc<A>, config: PollerConfig) -> Self {
        Self { api, config }
    }

    /// Poll until the job completes, fails, or the attempt budget runs out.
    pub async fn await_completion(&self, job_id: &JobId) -> Result<ArtifactRef> {
        self.await_completion_with_cancel(job_id, &CancelFlag::new())
            .await
    }

    /// Like [`await_completion`](Self::await_completion), but checks
    /// `cancel` before each sleep and exits early with `Canceled` once set.
    pub async fn await_completion_with_cancel(
        &self,
        job_id: &JobId,
        cancel: &CancelFlag,
    ) -> Result<ArtifactRef> {
        for attempt in 0..self.config.max_attempts {
            let record = self.api.get_prediction(job_id).await?;

            match record.status {
                JobStatus::Succeeded => return Self::extract_artifact(&record),
                JobStatus::Failed | JobStatus::Canceled => {
                    return Err(RetouchError::JobFailed(
                        record
                            .error
                            .unwrap_or_else(|| "Image generation failed".to_string()),
                    ));
                }
                // Queued, Running, and anything unrecognized: still working
                ref status => {
                    log::debug!(
                        "Job {} still {} (attempt {}/{})",
                        job_id,
                        status.as_str(),
                        attempt + 1,
                        self.config.max_attempts
                    );
                }
            }

            if cancel.is_canceled() {
                log::info!("Polling for job {} canceled by caller", job_id);
                return Err(RetouchError::Canceled);
            }

            tokio::time::sleep(self.config.interval).await;
        }

        Err(RetouchError::Timeout {
            attempts: self.config.max_attempts,
        })
    }

    /// Pull the artifact out of a succeeded snapshot.
    ///
    /// A succeeded job with no output is a contract violation by the
    /// service, surfaced as a poll error rather than an undefined artifact.
    fn extract_artifact(record: &JobRecord) -> Result<ArtifactRef> {
        record
            .output
            .as_ref()
            .and_then(|output| output.first())
            .map(ArtifactRef::new)
            .ok_or_else(|| {
                RetouchError::Poll("succeeded job returned no output".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPredictionsApi;
    use crate::domain::JobOutput;

    fn record(status: JobStatus) -> JobRecord {
        JobRecord {
            id: "p1".to_string(),
            status,
            output: None,
            error: None,
        }
    }

    fn succeeded(outputs: &[&str]) -> JobRecord {
        JobRecord {
            output: Some(JobOutput::Many(
                outputs.iter().map(|s| s.to_string()).collect(),
            )),
            ..record(JobStatus::Succeeded)
        }
    }

    fn fast_poller(api: Arc<MockPredictionsApi>, max_attempts: u32) -> JobPoller<MockPredictionsApi> {
        JobPoller::with_config(
            api,
            PollerConfig {
                interval: Duration::ZERO,
                max_attempts,
            },
        )
    }

    #[tokio::test]
    async fn test_queued_running_succeeded_takes_three_checks() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(record(JobStatus::Queued)));
        mock.queue_status(Ok(record(JobStatus::Running)));
        mock.queue_status(Ok(succeeded(&["https://x/out.png"])));

        let poller = fast_poller(mock.clone(), 10);
        let artifact = poller.await_completion(&JobId::new("p1")).await.unwrap();

        assert_eq!(artifact.as_str(), "https://x/out.png");
        assert_eq!(mock.status_calls(), 3);
    }

    #[tokio::test]
    async fn test_immediate_failure_one_check() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(JobRecord {
            error: Some("bad input".to_string()),
            ..record(JobStatus::Failed)
        }));

        let poller = fast_poller(mock.clone(), 10);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();

        assert_eq!(err.to_string(), "Job failed: bad input");
        assert_eq!(mock.status_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_without_detail_uses_generic_message() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(record(JobStatus::Failed)));

        let poller = fast_poller(mock, 10);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();
        assert_eq!(err.to_string(), "Job failed: Image generation failed");
    }

    #[tokio::test]
    async fn test_canceled_job_is_failure() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(JobRecord {
            error: Some("canceled by operator".to_string()),
            ..record(JobStatus::Canceled)
        }));

        let poller = fast_poller(mock, 10);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();
        assert!(matches!(err, RetouchError::JobFailed(_)));
    }

    #[tokio::test]
    async fn test_timeout_after_exactly_max_attempts() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status_times(record(JobStatus::Running), 5);

        let poller = fast_poller(mock.clone(), 5);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();

        assert!(matches!(err, RetouchError::Timeout { attempts: 5 }));
        assert_eq!(mock.status_calls(), 5);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_without_retry() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(record(JobStatus::Running)));
        mock.queue_status(Err(RetouchError::Poll("HTTP 500".to_string())));
        mock.queue_status_times(record(JobStatus::Running), 5);

        let poller = fast_poller(mock.clone(), 10);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();

        assert!(matches!(err, RetouchError::Poll(_)));
        assert_eq!(mock.status_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_output_is_contract_violation() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(succeeded(&[])));

        let poller = fast_poller(mock, 10);
        let err = poller.await_completion(&JobId::new("p1")).await.unwrap_err();
        assert!(matches!(err, RetouchError::Poll(_)));
    }

    #[tokio::test]
    async fn test_string_output_equivalent_to_one_element_array() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(JobRecord {
            output: Some(JobOutput::Single("https://x/out.png".to_string())),
            ..record(JobStatus::Succeeded)
        }));
        mock.queue_status(Ok(succeeded(&["https://x/out.png"])));

        let poller = fast_poller(mock, 10);
        let id = JobId::new("p1");
        let first = poller.await_completion(&id).await.unwrap();
        let second = poller.await_completion(&id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_status_keeps_polling() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(record(JobStatus::Other("warming_up".to_string()))));
        mock.queue_status(Ok(succeeded(&["https://x/out.png"])));

        let poller = fast_poller(mock.clone(), 10);
        let artifact = poller.await_completion(&JobId::new("p1")).await.unwrap();
        assert_eq!(artifact.as_str(), "https://x/out.png");
        assert_eq!(mock.status_calls(), 2);
    }

    #[tokio::test]
    async fn test_already_succeeded_is_idempotent() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(succeeded(&["https://x/out.png"])));
        mock.queue_status(Ok(succeeded(&["https://x/out.png"])));

        let poller = fast_poller(mock.clone(), 10);
        let id = JobId::new("p1");
        let first = poller.await_completion(&id).await.unwrap();
        let second = poller.await_completion(&id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.status_calls(), 2);
    }

    #[tokio::test]
    async fn test_cancel_flag_stops_polling() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status_times(record(JobStatus::Running), 5);

        let poller = fast_poller(mock.clone(), 10);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = poller
            .await_completion_with_cancel(&JobId::new("p1"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, RetouchError::Canceled));
        // The in-flight check completes; no further requests are issued
        assert_eq!(mock.status_calls(), 1);
    }

    #[tokio::test]
    async fn test_multi_output_takes_first() {
        let mock = Arc::new(MockPredictionsApi::new());
        mock.queue_status(Ok(succeeded(&["first.png", "second.png"])));

        let poller = fast_poller(mock, 10);
        let artifact = poller.await_completion(&JobId::new("p1")).await.unwrap();
        assert_eq!(artifact.as_str(), "first.png");
    }
}
