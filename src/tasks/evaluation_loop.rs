//! Polling loop that keeps a running clock moving

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Re-run the evaluation pass every `poll_interval` while the clock runs, and
/// sleep until the next moderator action while it is paused.
///
/// Each moderator action publishes a snapshot, which wakes this loop and
/// restarts the poll interval. Returns once the snapshot channel closes.
pub async fn evaluation_loop_task(state: Arc<AppState>) {
    info!(
        "Starting evaluation loop ({}ms poll interval)",
        state.poll_interval.as_millis()
    );

    let mut updates = state.subscribe();

    loop {
        let running = updates.borrow_and_update().running;

        if running {
            tokio::select! {
                _ = sleep(state.poll_interval) => {
                    match state.poll() {
                        Ok(snapshot) => debug!(
                            "Poll: stage {} at {} ({})",
                            snapshot.stage_index + 1,
                            snapshot.clock,
                            if snapshot.running { "running" } else { "stopped" }
                        ),
                        Err(e) => error!("Evaluation pass failed: {}", e),
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        } else {
            debug!("Clock paused, waiting for moderator");
            if updates.changed().await.is_err() {
                break;
            }
        }
    }

    info!("Evaluation loop stopped");
}
