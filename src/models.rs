//! Edit model presets.
//!
//! The service runs a named, version-pinned model per job. Two presets are
//! shipped: SDXL for general edits and InstructPix2Pix for
//! instruction-based image-to-image transformations.

use serde::{Deserialize, Serialize};

use crate::domain::EditParams;

/// A version-pinned transformation model and its default parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable model name, e.g. `stability-ai/sdxl`
    pub name: String,
    /// Version hash sent in the submission body
    pub version: String,
    /// Parameter defaults appropriate for this model
    pub defaults: EditParams,
}

impl ModelSpec {
    /// Stability AI SDXL - good general-purpose image editing.
    pub fn sdxl() -> Self {
        Self {
            name: "stability-ai/sdxl".to_string(),
            version: "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b"
                .to_string(),
            defaults: EditParams {
                num_inference_steps: 30,
                guidance_scale: 7.5,
                prompt_strength: Some(0.8),
                image_guidance_scale: None,
                negative_prompt: Some("blurry, bad quality, distorted, ugly".to_string()),
            },
        }
    }

    /// InstructPix2Pix - designed for instruction-based edits
    /// ("make the sky purple").
    pub fn instruct_pix2pix() -> Self {
        Self {
            name: "timothybrooks/instruct-pix2pix".to_string(),
            version: "30c1d0b916a6f8efce20493f5d61ee27491ab2a60437c13c588468b9810ec23f"
                .to_string(),
            defaults: EditParams {
                num_inference_steps: 50,
                guidance_scale: 7.5,
                prompt_strength: None,
                image_guidance_scale: Some(1.5),
                negative_prompt: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdxl_defaults() {
        let model = ModelSpec::sdxl();
        assert_eq!(model.defaults.num_inference_steps, 30);
        assert_eq!(model.defaults.guidance_scale, 7.5);
        assert_eq!(model.defaults.prompt_strength, Some(0.8));
        assert!(model.defaults.image_guidance_scale.is_none());
        assert!(model.version.len() == 64);
    }

    #[test]
    fn test_pix2pix_defaults() {
        let model = ModelSpec::instruct_pix2pix();
        assert_eq!(model.defaults.num_inference_steps, 50);
        assert_eq!(model.defaults.image_guidance_scale, Some(1.5));
        assert!(model.defaults.prompt_strength.is_none());
        assert!(model.defaults.negative_prompt.is_none());
    }

    #[test]
    fn test_presets_are_distinct() {
        assert_ne!(ModelSpec::sdxl().version, ModelSpec::instruct_pix2pix().version);
    }
}
