//! Output format tests.
//!
//! Every tool call resolves to a `CallToolResult` carrying text content: a
//! summary report on success, a failure report with a remediation hint on
//! error. The protocol call itself never fails for generation problems.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() {
        return Err("Result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    Ok(())
}

/// Validates that a Content item has valid structure.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        other => Err(format!(
            "Image servers only emit text content, got {other:?}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwen_image_mcp_common::Config;
    use qwen_image_mcp_fal::FalImageServer;
    use qwen_image_mcp_replicate::ReplicateImageServer;

    /// Text content passes validation, empty text does not.
    #[test]
    fn test_content_text_validation() {
        assert!(validate_content(&Content::text("Hello, world!")).is_ok());
        assert!(validate_content(&Content::text("")).is_err());
    }

    /// A successful result with text content validates.
    #[test]
    fn test_call_tool_result_success_helper() {
        let result = CallToolResult::success(vec![Content::text("Success")]);
        assert!(validate_tool_result(&result).is_ok());
        assert!(!result.is_error.unwrap_or(true));
    }

    /// An empty result never validates; even failures carry a report.
    #[test]
    fn test_empty_content_fails() {
        let result = CallToolResult {
            content: vec![],
            is_error: Some(true),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&result).is_err());
    }

    /// One invalid content item fails the whole result.
    #[test]
    fn test_one_invalid_content_fails() {
        let result = CallToolResult::success(vec![
            Content::text("Valid"),
            Content::text(""),
        ]);
        assert!(validate_tool_result(&result).is_err());
    }

    /// A credential-less fal.ai call still produces well-formed text content
    /// with the credential variable and a hint in it.
    #[tokio::test]
    async fn test_fal_degraded_result_is_well_formed() {
        let server = FalImageServer::new(Config::default());
        let params = serde_json::from_str(r#"{"prompt": "a cat"}"#).unwrap();

        let result = server.generate_image(params).await;
        assert_eq!(result.is_error, Some(true));
        assert!(validate_tool_result(&result).is_ok());

        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<String>();
        assert!(text.contains("FAL_KEY"), "{text}");
        assert!(text.contains("Hint:"), "{text}");
    }

    /// Same for the Replicate variant.
    #[tokio::test]
    async fn test_replicate_degraded_result_is_well_formed() {
        let server = ReplicateImageServer::new(Config::default());
        let params = serde_json::from_str(r#"{"prompt": "a cat"}"#).unwrap();

        let result = server.generate_image(params).await;
        assert_eq!(result.is_error, Some(true));
        assert!(validate_tool_result(&result).is_ok());

        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<String>();
        assert!(text.contains("REPLICATE_API_TOKEN"), "{text}");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use qwen_image_mcp_common::models::{
        DownloadedImage, GeneratedImage, GenerationResult, GenerateRequest,
    };
    use qwen_image_mcp_common::report;
    use std::time::Duration;

    fn valid_prompt_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!?]{1,100}".prop_filter("Must not be blank", |s| !s.trim().is_empty())
    }

    proptest! {
        /// Any success report renders as non-empty, well-formed text content.
        #[test]
        fn success_report_always_valid_content(
            prompt in valid_prompt_strategy(),
            elapsed_ms in 1u64..600_000,
            n_images in 1usize..4,
        ) {
            let request = GenerateRequest {
                prompt,
                size: "landscape_4_3".to_string(),
                num_inference_steps: 30,
                guidance_scale: 2.5,
                seed: None,
                negative_prompt: String::new(),
                num_images: n_images as u32,
                enable_safety_checker: true,
                output_format: "png".to_string(),
                acceleration: "none".to_string(),
                sync_mode: false,
            };
            let images: Vec<_> = (0..n_images)
                .map(|i| GeneratedImage {
                    url: format!("https://cdn.invalid/{i}.png"),
                    width: None,
                    height: None,
                    content_type: None,
                })
                .collect();
            let downloads: Vec<_> = images
                .iter()
                .map(|img| DownloadedImage { url: img.url.clone(), local_path: None })
                .collect();
            let result = GenerationResult {
                images,
                seed: None,
                request_id: None,
                nsfw_flags: None,
            };

            let text = report::render_success(
                "fal.ai",
                &request,
                &result,
                &downloads,
                Duration::from_millis(elapsed_ms),
            );
            let tool_result = CallToolResult::success(vec![Content::text(text)]);
            prop_assert!(validate_tool_result(&tool_result).is_ok());
        }

        /// Any failure report carries both the message and its hint.
        #[test]
        fn failure_report_carries_message_and_hint(
            message in "[a-zA-Z0-9 ]{1,80}",
            hint in "[a-zA-Z0-9 ]{1,80}",
        ) {
            let text = report::render_failure("Replicate", &message, &hint);
            prop_assert!(text.contains(&message));
            prop_assert!(text.contains(&hint));
            let tool_result = CallToolResult::error(vec![Content::text(text)]);
            prop_assert!(validate_tool_result(&tool_result).is_ok());
        }
    }
}
