//! Payload assembly and single-call dispatch.
//!
//! The payload for every request is the fixed instruction prefix followed by
//! the user's evidence items in submission order. It is built fresh per call;
//! nothing is retained between requests.

use std::sync::Arc;

use crate::models::Evidence;
use crate::services::providers::{ProviderError, TextProvider};

/// Fixed instruction sent ahead of the user's evidence on every call.
pub const ANALYSIS_PROMPT: &str = "You are reviewing evidence of a possible rental or \
online-marketplace scam. Examine the message text and any screenshots that follow and \
assess how likely the listing or conversation is to be fraudulent. Reply with: a RISK \
LEVEL (Low, Medium, or High), a SCORE from 0 to 100, a short explanation of the red \
flags you found (or their absence), and practical advice on what the recipient should \
do next.";

/// Ordered request payload: the instruction prefix, then the evidence items
/// exactly as submitted.
pub fn build_payload(evidence: &[Evidence]) -> Vec<Evidence> {
    let mut payload = Vec::with_capacity(evidence.len() + 1);
    payload.push(Evidence::Text(ANALYSIS_PROMPT.to_string()));
    payload.extend(evidence.iter().cloned());
    payload
}

/// Assembles the payload and makes exactly one call to the configured
/// provider. No retry, no backoff, no mutation of the response text.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn TextProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    pub async fn analyze(&self, evidence: &[Evidence]) -> Result<String, ProviderError> {
        let payload = build_payload(evidence);
        tracing::debug!(items = evidence.len(), "dispatching analysis request");
        self.provider.generate(&payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Evidence {
        Evidence::Text(s.to_string())
    }

    fn image(byte: u8) -> Evidence {
        Evidence::Image {
            mime_type: "image/png".to_string(),
            data: vec![byte],
        }
    }

    #[test]
    fn payload_has_prefix_followed_by_evidence_in_order() {
        let evidence = vec![text("Rent is $400/month, pay via Western Union today!"), image(1), image(2)];
        let payload = build_payload(&evidence);

        assert_eq!(payload.len(), evidence.len() + 1);
        assert_eq!(payload[0], Evidence::Text(ANALYSIS_PROMPT.to_string()));
        assert_eq!(&payload[1..], &evidence[..]);
    }

    #[test]
    fn empty_evidence_yields_prefix_only() {
        let payload = build_payload(&[]);
        assert_eq!(payload, vec![Evidence::Text(ANALYSIS_PROMPT.to_string())]);
    }

    #[tokio::test]
    async fn analyze_passes_response_text_through_unmodified() {
        use crate::services::providers::mock::MockProvider;
        use std::sync::Arc;

        let dispatcher = Dispatcher::new(Arc::new(MockProvider::new(true)));
        let evidence = vec![text("Rent is $400/month, pay via Western Union today!")];

        let response = dispatcher.analyze(&evidence).await.expect("dispatch failed");

        // Prefix + 1 evidence item = 2 parts; the mock echoes the count.
        assert_eq!(
            response,
            "RISK LEVEL: High\nSCORE: 87\nMock analysis for 2 content part(s)."
        );
    }

    #[tokio::test]
    async fn analyze_propagates_provider_errors() {
        use crate::services::providers::mock::MockProvider;
        use std::sync::Arc;

        let dispatcher = Dispatcher::new(Arc::new(MockProvider::new(false)));
        let result = dispatcher.analyze(&[text("anything")]).await;

        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
