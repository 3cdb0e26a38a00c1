//! Debate Timer - a moderator-controlled countdown for staged debate rounds
//!
//! This is the main entry point for the debate-timer application.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use debate_timer::{
    api::create_router,
    audio::{CuePlayer, SilentPlayer, SoundBank},
    config::Config,
    state::AppState,
    tasks::evaluation_loop_task,
    utils::shutdown_signal,
};

fn select_player(config: &Config) -> Arc<dyn CuePlayer> {
    if config.mute {
        info!("Audio muted, cues will only be logged");
        return Arc::new(SilentPlayer);
    }
    default_player()
}

#[cfg(feature = "playback")]
fn default_player() -> Arc<dyn CuePlayer> {
    Arc::new(debate_timer::audio::RodioPlayer)
}

#[cfg(not(feature = "playback"))]
fn default_player() -> Arc<dyn CuePlayer> {
    Arc::new(debate_timer::audio::CommandPlayer::new())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("debate_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting debate-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, sounds={}, poll={}ms",
        config.host,
        config.port,
        config.sounds_dir.display(),
        config.poll_interval().as_millis()
    );

    // A missing sound aborts startup
    let sounds = SoundBank::load(&config.sounds_dir)
        .await
        .context("failed to load sound assets")?;

    let state = Arc::new(AppState::new(
        sounds,
        select_player(&config),
        config.volumes(),
        config.poll_interval(),
        config.host.clone(),
        config.port,
    ));

    // Start the evaluation loop background task
    let loop_state = Arc::clone(&state);
    tokio::spawn(async move {
        evaluation_loop_task(loop_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Control panel running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start | /pause | /reset | /next | /prev");
    info!("  POST /jump/:index            - Start a stage from the top");
    info!("  POST /jump-to-three-minutes  - Speaker shortcut (one knock)");
    info!("  POST /volume/knock | /volume/bell  {{\"level\": 0.0-1.0}}");
    info!("  POST /test/:cue              - knock-1, knock-2 or bell");
    info!("  GET  /status | /stages | /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
