//! Input parameter validation tests.
//!
//! Invalid tool parameters must be rejected by backend validation before any
//! platform call, with one error entry per offending field.

#[cfg(test)]
mod tests {
    use qwen_image_mcp_common::backend::{validate_common, InferenceBackend};
    use qwen_image_mcp_common::models::GenerateRequest;
    use qwen_image_mcp_fal::handler as fal;
    use qwen_image_mcp_replicate::handler as replicate;

    fn fal_request(json: &str) -> GenerateRequest {
        let params: fal::GenerateImageToolParams =
            serde_json::from_str(json).expect("valid params");
        params.into()
    }

    fn replicate_request(json: &str) -> GenerateRequest {
        let params: replicate::GenerateImageToolParams =
            serde_json::from_str(json).expect("valid params");
        params.into()
    }

    /// The fal.ai backend rejects an out-of-range image count.
    #[test]
    fn test_fal_rejects_out_of_range_num_images() {
        let request = fal_request(r#"{"prompt": "a cat", "num_images": 10}"#);

        let errors = validate_common(&request);
        assert!(
            errors.iter().any(|e| e.field == "num_images"),
            "Should have num_images validation error"
        );
    }

    /// The fal.ai backend rejects an unknown image size and names the field.
    #[test]
    fn test_fal_rejects_invalid_image_size() {
        let backend = fal::FalBackend::new();
        let request = fal_request(r#"{"prompt": "a cat", "image_size": "2:1"}"#);

        let errors = backend.validate(&request).unwrap_err();
        assert!(
            errors.iter().any(|e| e.field == "image_size"),
            "Should have image_size validation error"
        );
    }

    /// The Replicate backend rejects an unknown aspect ratio.
    #[test]
    fn test_replicate_rejects_invalid_aspect_ratio() {
        let backend = replicate::ReplicateBackend::new();
        let request = replicate_request(r#"{"prompt": "a cat", "aspect_ratio": "2:1"}"#);

        let errors = backend.validate(&request).unwrap_err();
        assert!(
            errors.iter().any(|e| e.field == "aspect_ratio"),
            "Should have aspect_ratio validation error"
        );
    }

    /// A whitespace-only prompt fails the shared validation on both variants.
    #[test]
    fn test_empty_prompt_rejected_everywhere() {
        for request in [
            fal_request(r#"{"prompt": "   "}"#),
            replicate_request(r#"{"prompt": "   "}"#),
        ] {
            let errors = validate_common(&request);
            assert!(errors.iter().any(|e| e.field == "prompt"));
        }
    }

    /// Multiple invalid fields are all reported, not just the first.
    #[test]
    fn test_all_violations_collected() {
        let backend = fal::FalBackend::new();
        let request = fal_request(
            r#"{"prompt": "a cat", "image_size": "huge",
                "num_inference_steps": 500, "guidance_scale": 99.0}"#,
        );

        let errors = backend.validate(&request).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"image_size"), "got {fields:?}");
        assert!(fields.contains(&"num_inference_steps"), "got {fields:?}");
        assert!(fields.contains(&"guidance_scale"), "got {fields:?}");
    }

    /// Step and guidance ranges differ per platform; each accepts its own
    /// documented extremes.
    #[test]
    fn test_platform_specific_ranges() {
        let fal_backend = fal::FalBackend::new();
        let replicate_backend = replicate::ReplicateBackend::new();

        // 100 steps is legal on Replicate, out of range on fal.ai.
        let request = replicate_request(r#"{"prompt": "a cat", "num_inference_steps": 100}"#);
        assert!(replicate_backend.validate(&request).is_ok());

        let request = fal_request(r#"{"prompt": "a cat", "num_inference_steps": 100}"#);
        assert!(fal_backend.validate(&request).is_err());

        // Guidance 15 is legal on fal.ai, out of range on Replicate.
        let request = fal_request(r#"{"prompt": "a cat", "guidance_scale": 15.0}"#);
        assert!(fal_backend.validate(&request).is_ok());

        let request = replicate_request(r#"{"prompt": "a cat", "guidance": 15.0}"#);
        assert!(replicate_backend.validate(&request).is_err());
    }
}
