//! Server startup integration tests.
//!
//! Tests that each server variant can be instantiated and provides correct
//! server info, including the degraded credential-less state.

use qwen_image_mcp_common::Config;
use rmcp::ServerHandler;

/// Test configuration for integration tests.
fn test_config() -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwen_image_mcp_fal::FalImageServer;
    use qwen_image_mcp_replicate::ReplicateImageServer;

    /// The fal.ai variant starts and describes itself.
    #[test]
    fn test_fal_server_startup() {
        let server = FalImageServer::new(test_config());
        let info = server.get_info();

        assert!(info.instructions.is_some());
        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("image"),
            "Server instructions should mention 'image'"
        );
        assert!(instructions.contains("fal.ai"));
    }

    /// The Replicate variant starts and describes itself.
    #[test]
    fn test_replicate_server_startup() {
        let server = ReplicateImageServer::new(test_config());
        let info = server.get_info();

        assert!(info.instructions.is_some());
        let instructions = info.instructions.as_ref().unwrap();
        assert!(instructions.contains("Replicate"));
    }

    /// Both variants advertise tool support.
    #[test]
    fn test_servers_advertise_tools_capability() {
        let fal = FalImageServer::new(test_config());
        let replicate = ReplicateImageServer::new(test_config());

        assert!(fal.get_info().capabilities.tools.is_some());
        assert!(replicate.get_info().capabilities.tools.is_some());
    }

    /// A server built without any credential still constructs; calls degrade
    /// instead of crashing.
    #[test]
    fn test_server_startup_without_credential() {
        let config = Config::default();
        assert!(!config.has_credential());

        let server = FalImageServer::new(config.clone());
        assert!(server.get_info().instructions.is_some());

        let server = ReplicateImageServer::new(config);
        assert!(server.get_info().instructions.is_some());
    }
}
