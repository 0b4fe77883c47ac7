//! Health check endpoint

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::core::AppState;
use crate::utils::AppResult;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health - liveness probe, pings the database
async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| crate::utils::AppError::database(e.to_string()))?;

    Ok(Json(json!({ "status": "ok" })))
}
