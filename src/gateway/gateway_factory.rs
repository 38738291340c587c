use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::{error, info};

use crate::config::ModelConfig;
use super::gateway_interface::ModelGateway;
use super::gemini_gateway::GeminiGateway;

/// Factory for creating model gateways
pub struct GatewayFactory;

impl GatewayFactory {
    /// Build the gateway described by `config`.
    ///
    /// Returns `Ok(None)` when no credential is available. The server keeps
    /// running in that case and answers every chat request with a
    /// configuration error.
    pub fn create_gateway(config: &ModelConfig) -> Result<Option<Arc<dyn ModelGateway>>> {
        let Some(api_key) = config.resolve_api_key() else {
            error!(
                "No API key found in ${}; model gateway is not configured",
                config.api_key_env
            );
            return Ok(None);
        };

        info!("Initializing model gateway: {} ({})", config.provider, config.model);
        let timeout = config.request_timeout_secs.map(Duration::from_secs);

        match config.provider.as_str() {
            "gemini" => {
                let gateway: Arc<dyn ModelGateway> = Arc::new(GeminiGateway::new(
                    api_key,
                    config.model.clone(),
                    config.base_url.clone(),
                    timeout,
                )?);
                Ok(Some(gateway))
            }
            other => Err(anyhow::anyhow!("Unsupported model provider: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_leaves_gateway_unconfigured() {
        let config = ModelConfig {
            api_key_env: "STUDYBUDDY_FACTORY_UNSET_KEY".to_string(),
            ..ModelConfig::default()
        };
        std::env::remove_var("STUDYBUDDY_FACTORY_UNSET_KEY");
        assert!(GatewayFactory::create_gateway(&config).unwrap().is_none());
    }

    #[test]
    fn test_placeholder_credential_leaves_gateway_unconfigured() {
        let config = ModelConfig {
            api_key: Some("${GEMINI_API_KEY}".to_string()),
            api_key_env: "STUDYBUDDY_FACTORY_PLACEHOLDER_KEY".to_string(),
            ..ModelConfig::default()
        };
        std::env::remove_var("STUDYBUDDY_FACTORY_PLACEHOLDER_KEY");
        assert!(GatewayFactory::create_gateway(&config).unwrap().is_none());
    }

    #[test]
    fn test_explicit_credential_builds_gemini() {
        let config = ModelConfig {
            api_key: Some("test-key".to_string()),
            request_timeout_secs: Some(30),
            ..ModelConfig::default()
        };
        assert!(GatewayFactory::create_gateway(&config).unwrap().is_some());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = ModelConfig {
            provider: "llama".to_string(),
            api_key: Some("test-key".to_string()),
            ..ModelConfig::default()
        };
        assert!(GatewayFactory::create_gateway(&config).is_err());
    }
}
