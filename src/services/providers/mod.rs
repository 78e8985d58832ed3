//! Generation backends behind a trait seam, so the Gemini client can be
//! swapped for a mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::Evidence;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A model the configured credential can use for content generation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
}

/// Trait for text generation backends (Gemini, or a mock in tests).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Make one generation call with the ordered payload and return the raw
    /// response text, unmodified.
    async fn generate(&self, payload: &[Evidence]) -> Result<String, ProviderError>;

    /// List the models this credential can call generateContent on.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
