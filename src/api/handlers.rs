//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::{info, warn};

use crate::{
    engine::SettingsForm,
    error::AppError,
    state::AppState,
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /toggle - Start or stop the clock
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    match state.toggle_running() {
        Ok(clock) => {
            let message = if clock.running {
                format!("Clock started, {} side to move", clock.active_side)
            } else {
                "Clock stopped".to_string()
            };
            Ok(Json(ApiResponse::from_clock(message, clock)))
        }
        Err(e) => {
            warn!("Toggle refused: {}", e);
            Err(e)
        }
    }
}

/// Handle POST /switch - Pass the move to the other side
pub async fn switch_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.switch_side()?;
    let message = if clock.running {
        format!("{} side to move", clock.active_side)
    } else {
        "Flag fell before the move completed".to_string()
    };
    Ok(Json(ApiResponse::from_clock(message, clock)))
}

/// Handle POST /reset - Stop and restore preset times
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.reset()?;
    Ok(Json(ApiResponse::from_clock("Clock reset", clock)))
}

/// Handle GET /settings - Current values as an editable form
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsForm>, AppError> {
    state.settings_form().map(Json)
}

/// Handle PUT /settings - Validate and commit a settings form
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<ApiResponse>, AppError> {
    match state.configure(&form) {
        Ok(clock) => {
            info!("Settings endpoint called - clock reconfigured");
            Ok(Json(ApiResponse::from_clock("Settings applied", clock)))
        }
        Err(e) => {
            warn!("Settings rejected: {}", e);
            Err(e)
        }
    }
}

/// Handle GET /status - Return current clock status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    let (clock, phase) = state.status()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        phase,
        clock,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
