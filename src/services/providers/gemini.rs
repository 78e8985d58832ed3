//! Gemini backend.
//!
//! One synchronous `generateContent` call per request; the ordered payload
//! maps to content parts of a single user-role entry.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::{ModelInfo, ProviderError, TextProvider};
use crate::models::Evidence;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
}

/// Gemini text provider.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE,
            self.config.model,
            method,
            self.config.api_key.expose_secret()
        )
    }
}

/// Convert the ordered payload into Gemini content parts, preserving order.
fn payload_to_parts(payload: &[Evidence]) -> Vec<ContentPart> {
    payload
        .iter()
        .map(|item| match item {
            Evidence::Text(text) => ContentPart::Text { text: text.clone() },
            Evidence::Image { mime_type, data } => ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                },
            },
        })
        .collect()
}

#[async_trait]
impl TextProvider for GeminiProvider {
    async fn generate(&self, payload: &[Evidence]) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: payload_to_parts(payload),
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            parts = payload.len(),
            "Sending generateContent request to Gemini"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError("Response contained no candidates".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ProviderError::ContentFiltered);
        }

        candidate
            .content
            .parts
            .into_iter()
            .find_map(|part| match part {
                ContentPart::Text { text } => Some(text),
                ContentPart::InlineData { .. } => None,
            })
            .ok_or_else(|| ProviderError::ApiError("Response contained no text".to_string()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = format!(
            "{}/models?key={}",
            GEMINI_API_BASE,
            self.config.api_key.expose_secret()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "Model listing failed: {}",
                response.status()
            )));
        }

        let listing: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse model list: {}", e)))?;

        // Only models that can generate content are usable here.
        Ok(listing
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| ModelInfo { name: m.name })
            .collect())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/models?key={}",
            GEMINI_API_BASE,
            self.config.api_key.expose_secret()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_evidence_maps_to_text_part() {
        let payload = vec![Evidence::Text("hello".to_string())];
        let parts = payload_to_parts(&payload);

        assert_eq!(parts.len(), 1);
        match &parts[0] {
            ContentPart::Text { text } => assert_eq!(text, "hello"),
            ContentPart::InlineData { .. } => panic!("expected a text part"),
        }
    }

    #[test]
    fn image_evidence_is_base64_encoded_with_its_mime_type() {
        let payload = vec![Evidence::Image {
            mime_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        }];
        let parts = payload_to_parts(&payload);

        match &parts[0] {
            ContentPart::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, BASE64.encode([1u8, 2, 3]));
            }
            ContentPart::Text { .. } => panic!("expected an inline data part"),
        }
    }

    #[test]
    fn part_order_matches_payload_order() {
        let payload = vec![
            Evidence::Text("first".to_string()),
            Evidence::Image {
                mime_type: "image/jpeg".to_string(),
                data: vec![0xff],
            },
            Evidence::Text("last".to_string()),
        ];
        let parts = payload_to_parts(&payload);

        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[0], ContentPart::Text { .. }));
        assert!(matches!(parts[1], ContentPart::InlineData { .. }));
        assert!(matches!(parts[2], ContentPart::Text { .. }));
    }
}
