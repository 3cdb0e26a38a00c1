//! HTTP API module
//!
//! The moderator's control panel: display state and one endpoint per control.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/next", post(next_handler))
        .route("/prev", post(prev_handler))
        .route("/jump/:index", post(jump_handler))
        .route("/jump-to-three-minutes", post(three_minutes_handler))
        .route("/volume/knock", post(knock_volume_handler))
        .route("/volume/bell", post(bell_volume_handler))
        .route("/test/:cue", post(test_sound_handler))
        .route("/status", get(status_handler))
        .route("/stages", get(stages_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
