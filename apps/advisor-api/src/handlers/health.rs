use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::services::health::{check, HealthReport};
use crate::state::AppState;

/// `GET /health`. Always 200; degradation is reported in the body.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(check(&state).await)
}
