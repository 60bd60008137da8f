//! Edit request types - what the caller wants done to an image.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetouchError};
use crate::models::ModelSpec;

/// Numeric tuning knobs for an edit job.
///
/// Optional fields are model-specific: SDXL uses `prompt_strength`,
/// InstructPix2Pix uses `image_guidance_scale`. Absent fields are left out
/// of the wire body entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditParams {
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_guidance_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

/// One image-edit request: the input image, the instruction, and the model
/// to run it through.
///
/// The image is expected to be base64-encoded PNG data without the data URI
/// prefix; format and size validation happen upstream in the caller.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image_base64: String,
    pub instruction: String,
    pub model: ModelSpec,
    pub params: EditParams,
}

impl EditRequest {
    /// Create a request against the default model (SDXL).
    ///
    /// Fails with `InvalidRequest` if the image payload is empty or the
    /// instruction is empty after trimming.
    pub fn new(image_base64: impl Into<String>, instruction: impl Into<String>) -> Result<Self> {
        let image_base64 = image_base64.into();
        let instruction = instruction.into();

        if image_base64.is_empty() {
            return Err(RetouchError::InvalidRequest(
                "image payload is empty".to_string(),
            ));
        }
        if instruction.trim().is_empty() {
            return Err(RetouchError::InvalidRequest(
                "instruction is empty".to_string(),
            ));
        }

        let model = ModelSpec::sdxl();
        let params = model.defaults.clone();
        Ok(Self {
            image_base64,
            instruction,
            model,
            params,
        })
    }

    /// Switch to a different model, resetting params to its defaults.
    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.params = model.defaults.clone();
        self.model = model;
        self
    }

    /// Override the tuning parameters.
    pub fn with_params(mut self, params: EditParams) -> Self {
        self.params = params;
        self
    }

    /// Inline data URI for the wire body.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.image_base64)
    }
}
