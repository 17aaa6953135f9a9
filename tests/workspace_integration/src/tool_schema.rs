//! Tool schema validity tests.
//!
//! Both variants advertise a single `generate_image` tool; its JSON schema
//! must be a valid object schema naming `prompt` as a required parameter.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    match tool.description.as_ref() {
        Some(d) if !d.is_empty() => {}
        _ => return Err(format!("Tool '{}' must have a description", tool.name)),
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::schema_for;
    use std::borrow::Cow;
    use std::sync::Arc;

    fn schema_value_of(schema: schemars::schema::RootSchema) -> Value {
        serde_json::to_value(&schema).expect("schema serializes")
    }

    /// The JSON schema validation helper accepts object schemas and rejects
    /// non-object ones.
    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string" }
            },
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({ "type": "string" });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    /// The tool validation helper enforces name, description and schema.
    #[test]
    fn test_tool_validation() {
        let valid_tool = rmcp::model::Tool {
            name: Cow::Borrowed("generate_image"),
            description: Some(Cow::Borrowed("Generate an image")),
            input_schema: Arc::new(
                serde_json::json!({
                    "type": "object",
                    "properties": {}
                })
                .as_object()
                .unwrap()
                .clone(),
            ),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&valid_tool).is_ok());

        let invalid_tool = rmcp::model::Tool {
            name: Cow::Borrowed(""),
            description: Some(Cow::Borrowed("Generate an image")),
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&invalid_tool).is_err());

        let invalid_tool = rmcp::model::Tool {
            name: Cow::Borrowed("generate_image"),
            description: None,
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&invalid_tool).is_err());
    }

    /// The fal.ai tool parameters produce a valid schema with `prompt`
    /// required and the optional knobs present.
    #[test]
    fn test_fal_tool_params_schema() {
        let schema = schema_value_of(schema_for!(
            qwen_image_mcp_fal::handler::GenerateImageToolParams
        ));
        assert!(validate_json_schema(&schema).is_ok());

        let obj = schema.as_object().unwrap();
        let properties = obj.get("properties").unwrap().as_object().unwrap();
        assert!(properties.contains_key("prompt"));
        assert!(properties.contains_key("image_size"));
        assert!(properties.contains_key("num_images"));
        assert!(properties.contains_key("output_format"));

        let required = obj.get("required").unwrap().as_array().unwrap();
        assert_eq!(required, &[serde_json::json!("prompt")]);
    }

    /// The Replicate tool parameters produce a valid schema with `prompt`
    /// required and the aspect-ratio surface present.
    #[test]
    fn test_replicate_tool_params_schema() {
        let schema = schema_value_of(schema_for!(
            qwen_image_mcp_replicate::handler::GenerateImageToolParams
        ));
        assert!(validate_json_schema(&schema).is_ok());

        let obj = schema.as_object().unwrap();
        let properties = obj.get("properties").unwrap().as_object().unwrap();
        assert!(properties.contains_key("prompt"));
        assert!(properties.contains_key("aspect_ratio"));
        assert!(properties.contains_key("guidance"));
        assert!(!properties.contains_key("num_images"));

        let required = obj.get("required").unwrap().as_array().unwrap();
        assert_eq!(required, &[serde_json::json!("prompt")]);
    }
}
