//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{ClockPhase, ClockSnapshot, SettingsField, Side},
    error::AppError,
};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub clock: ClockSnapshot,
}

impl ApiResponse {
    pub fn new(status: String, message: String, clock: ClockSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            clock,
        }
    }

    /// Response whose status reflects the clock's running/stopped/flagged state
    pub fn from_clock(message: impl Into<String>, clock: ClockSnapshot) -> Self {
        let status = if clock.running {
            "running"
        } else if clock.flagged.is_some() {
            "flagged"
        } else {
            "stopped"
        };
        Self::new(status.to_string(), message.into(), clock)
    }
}

/// Full status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: ClockPhase,
    pub clock: ClockSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Offending settings field, for rejected settings commits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<SettingsField>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, side, field) = match &self {
            AppError::Engine(_) | AppError::NotRunning => (StatusCode::CONFLICT, None, None),
            AppError::InvalidSettings(e) => (StatusCode::UNPROCESSABLE_ENTITY, Some(e.side()), Some(e.field())),
            AppError::LockPoisoned(_) => (StatusCode::INTERNAL_SERVER_ERROR, None, None),
        };

        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
            side,
            field,
        };
        (code, Json(body)).into_response()
    }
}
