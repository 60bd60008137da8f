//! Orchestration - the one integration point exposed to the UI layer.
//!
//! [`ImageEditor::edit`] sequences submission and polling. Errors from
//! either stage propagate unchanged; no partial result is ever returned.

use std::sync::{Arc, Mutex};

use crate::api::PredictionsApi;
use crate::domain::{ArtifactRef, EditRequest};
use crate::error::Result;
use crate::history::{EditHistory, EditRecord};
use crate::poller::{CancelFlag, JobPoller, PollerConfig};
use crate::submitter::JobSubmitter;

/// Default number of past edits kept in memory
const DEFAULT_HISTORY_CAPACITY: usize = 12;

/// High-level edit workflow: submit, poll, remember.
///
/// Each `edit` call owns its own job state; concurrent calls run as
/// independent jobs with no shared queue or dedup.
pub struct ImageEditor<A: PredictionsApi> {
    submitter: JobSubmitter<A>,
    poller: JobPoller<A>,
    history: Mutex<EditHistory>,
}

impl<A: PredictionsApi> ImageEditor<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_config(api, PollerConfig::default(), DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_config(api: Arc<A>, poll: PollerConfig, history_capacity: usize) -> Self {
        Self {
            submitter: JobSubmitter::new(api.clone()),
            poller: JobPoller::with_config(api, poll),
            history: Mutex::new(EditHistory::new(history_capacity)),
        }
    }

    /// Run one edit end to end and return the output artifact.
    pub async fn edit(&self, request: &EditRequest) -> Result<ArtifactRef> {
        self.edit_with_cancel(request, &CancelFlag::new()).await
    }

    /// Like [`edit`](Self::edit), with a caller-held cancellation flag
    /// checked between polls.
    pub async fn edit_with_cancel(
        &self,
        request: &EditRequest,
        cancel: &CancelFlag,
    ) -> Result<ArtifactRef> {
        let job_id = self.submitter.submit(request).await?;
        let artifact = self
            .poller
            .await_completion_with_cancel(&job_id, cancel)
            .await?;

        self.history
            .lock()
            .unwrap()
            .record(&request.instruction, artifact.clone());

        Ok(artifact)
    }

    /// Recent successful edits, newest first.
    pub fn recent(&self) -> Vec<EditRecord> {
        self.history.lock().unwrap().recent()
    }
}
