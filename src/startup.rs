//! Application startup and lifecycle management.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ProviderKind};
use crate::error::AppError;
use crate::handlers::{
    analyze::analyze,
    app::{health_check, index, readiness_check},
    models::list_models,
};
use crate::middleware::tracing::request_id_middleware;
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::providers::mock::MockProvider;
use crate::services::providers::TextProvider;
use crate::services::Dispatcher;

/// Request body cap for the multipart form.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dispatcher: Dispatcher,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn TextProvider> = match config.genai.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.genai.text_model.clone(),
            })),
            ProviderKind::Mock => Arc::new(MockProvider::new(config.genai.mock_enabled)),
        };

        tracing::info!(
            provider = ?config.genai.provider,
            model = %config.genai.text_model,
            "Initialized text provider"
        );

        let state = AppState {
            config: config.clone(),
            dispatcher: Dispatcher::new(provider),
        };

        // Port 0 = random port for testing.
        let address = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/models", get(list_models))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
