//! Engine status handler

use axum::{extract::State, Json};
use serde::Serialize;

use phishguard_core::EngineStatus;

use crate::AppState;

/// Loaded-artifact diagnostics for operators and the frontend dashboard.
#[derive(Serialize)]
pub struct StatusResponse {
    pub environment: String,
    #[serde(flatten)]
    pub engine: EngineStatus,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        environment: state.config.environment.clone(),
        engine: state.engine.status(),
    })
}
