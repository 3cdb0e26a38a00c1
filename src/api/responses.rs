//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    state::{StageKind, TimerSnapshot, Volumes},
};

/// Response to every moderator control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ControlResponse {
    pub fn new(action: &str, timer: TimerSnapshot) -> Self {
        Self {
            action: action.to_string(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full display state plus server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub volumes: Volumes,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// One entry of the jump-to-stage selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEntry {
    pub index: usize,
    pub label: String,
    pub name: String,
    pub duration_seconds: u32,
    pub kind: StageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesResponse {
    pub current_index: usize,
    pub stages: Vec<StageEntry>,
    pub order: Vec<String>,
}

/// Body of the volume sliders
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeRequest {
    pub level: f32,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Error wrapper that renders [`TimerError`] as a JSON body
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::StageOutOfRange { .. }
            | TimerError::InvalidVolume(_)
            | TimerError::UnknownCue(_) => StatusCode::BAD_REQUEST,
            TimerError::NotSpeakerStage { .. } => StatusCode::CONFLICT,
            TimerError::AssetLoad { .. }
            | TimerError::EmptyAsset { .. }
            | TimerError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
