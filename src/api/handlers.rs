//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::{error, warn};

use super::responses::{
    ApiError, ControlResponse, HealthResponse, StageEntry, StagesResponse, StatusResponse,
    VolumeRequest,
};
use crate::state::{AppState, Command, Cue, Sequence};

type ControlResult = Result<Json<ControlResponse>, ApiError>;

/// Run a moderator command and report the resulting display state
fn control(state: &AppState, command: Command) -> ControlResult {
    match state.dispatch(command) {
        Ok(snapshot) => Ok(Json(ControlResponse::new(command.name(), snapshot))),
        Err(e) => {
            warn!("Rejected {}: {}", command.name(), e);
            Err(e.into())
        }
    }
}

/// Handle POST /start - Start or resume the clock
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::Start)
}

/// Handle POST /pause - Pause the clock
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::Pause)
}

/// Handle POST /reset - Rewind the current stage
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::Reset)
}

/// Handle POST /next
pub async fn next_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::Next)
}

/// Handle POST /prev
pub async fn prev_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::Prev)
}

/// Handle POST /jump/:index - Start the given stage from the top
pub async fn jump_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ControlResult {
    control(&state, Command::JumpTo { index })
}

/// Handle POST /jump-to-three-minutes - Speaker shortcut to 1:00 remaining
pub async fn three_minutes_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    control(&state, Command::JumpToThreeMinutes)
}

/// Handle POST /volume/knock
pub async fn knock_volume_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VolumeRequest>,
) -> ControlResult {
    control(&state, Command::SetKnockVolume { level: body.level })
}

/// Handle POST /volume/bell
pub async fn bell_volume_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VolumeRequest>,
) -> ControlResult {
    control(&state, Command::SetBellVolume { level: body.level })
}

/// Handle POST /test/:cue - Sound check, does not count as the cue firing
pub async fn test_sound_handler(
    State(state): State<Arc<AppState>>,
    Path(cue): Path<String>,
) -> ControlResult {
    let cue: Cue = cue.parse()?;
    control(&state, Command::TestSound { cue })
}

/// Handle GET /status - Return the display state
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let timer = state.snapshot().inspect_err(|e| error!("Failed to read timer: {}", e))?;
    let volumes = state.volumes()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        volumes,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /stages - List the running order for the jump selector
pub async fn stages_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StagesResponse>, ApiError> {
    let sequence = state.sequence()?;
    let current_index = state.snapshot()?.stage_index;

    let stages = sequence
        .iter()
        .enumerate()
        .map(|(index, stage)| StageEntry {
            index,
            label: sequence.label(index).unwrap_or_default(),
            name: stage.name.clone(),
            duration_seconds: stage.duration_seconds,
            kind: stage.kind,
        })
        .collect();

    Ok(Json(StagesResponse {
        current_index,
        stages,
        order: Sequence::order_summary().into_iter().map(String::from).collect(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
