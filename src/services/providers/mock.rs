//! Mock provider for testing.

use async_trait::async_trait;

use super::{ModelInfo, ProviderError, TextProvider};
use crate::models::Evidence;

/// Deterministic stand-in for the Gemini backend. With `enabled == false`
/// every call fails, which is how tests inject a failing remote call.
pub struct MockProvider {
    enabled: bool,
}

impl MockProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    async fn generate(&self, payload: &[Evidence]) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            ));
        }

        // Simulate some processing
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(format!(
            "RISK LEVEL: High\nSCORE: 87\nMock analysis for {} content part(s).",
            payload.len()
        ))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            ));
        }

        Ok(vec![
            ModelInfo {
                name: "models/gemini-2.0-flash".to_string(),
            },
            ModelInfo {
                name: "models/gemini-2.0-pro".to_string(),
            },
        ])
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            ))
        }
    }
}
