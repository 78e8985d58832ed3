use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppError;
use crate::startup::AppState;

/// List the models the configured credential can actually use for content
/// generation.
pub async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let models = state.dispatcher.provider().list_models().await?;
    Ok(Json(json!({ "models": models })))
}
