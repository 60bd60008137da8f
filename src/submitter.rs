//! Job submission - turns an [`EditRequest`] into a remote job.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::api::PredictionsApi;
use crate::domain::{EditRequest, JobId};
use crate::error::{Result, RetouchError};

/// Submits edit jobs to the predictions service.
///
/// Submission is a single network call; a failure here is terminal for
/// that call and is never retried at this layer.
pub struct JobSubmitter<A: PredictionsApi> {
    api: Arc<A>,
}

impl<A: PredictionsApi> JobSubmitter<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Submit an edit job and return its id.
    pub async fn submit(&self, request: &EditRequest) -> Result<JobId> {
        let body = self.build_request(request);
        let record = self.api.create_prediction(body).await?;

        if record.id.is_empty() {
            return Err(RetouchError::Submission(
                "service returned an empty job id".to_string(),
            ));
        }

        log::info!(
            "Submitted edit job {} (model {})",
            record.id,
            request.model.name
        );
        Ok(JobId::new(record.id))
    }

    /// Build the wire body for a submission.
    fn build_request(&self, request: &EditRequest) -> Value {
        let params = &request.params;

        let mut input = json!({
            "image": request.data_uri(),
            "prompt": request.instruction,
            "num_inference_steps": params.num_inference_steps,
            "guidance_scale": params.guidance_scale,
        });

        if let Some(negative) = &params.negative_prompt {
            input["negative_prompt"] = json!(negative);
        }
        if let Some(strength) = params.prompt_strength {
            input["prompt_strength"] = json!(strength);
        }
        if let Some(scale) = params.image_guidance_scale {
            input["image_guidance_scale"] = json!(scale);
        }

        json!({
            "version": request.model.version,
            "input": input,
        })
    }
}
