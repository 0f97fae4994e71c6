//! Background expiry for idle chat sessions.
//!
//! DESIGN
//! ======
//! Chat transcripts live only in memory and only for as long as a visitor
//! keeps the page open. Browsers rarely say goodbye, so a background task
//! wakes every `CHAT_SWEEP_INTERVAL_SECS` and drops conversations idle for
//! longer than `CHAT_SESSION_IDLE_SECS`. The same tick purges drained
//! rate-limit buckets.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::state::AppState;

/// Spawn the background sweeper. Returns a handle for shutdown.
pub fn spawn_session_sweeper(state: AppState) -> JoinHandle<()> {
    // `tokio::time::interval` panics on zero.
    let interval = state.config.sweep_interval.max(Duration::from_secs(1));
    let idle = state.config.session_idle;
    info!(interval_secs = interval.as_secs(), idle_secs = idle.as_secs(), "chat session sweeper configured");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; nothing can be idle yet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let expired = sweep_idle_sessions(&state, Instant::now()).await;
            let purged = state.rate_limiter.purge_idle();
            if expired > 0 || purged > 0 {
                debug!(expired, purged, "sweep complete");
            }
        }
    })
}

/// Drop every conversation idle for longer than the configured limit.
/// Returns how many were dropped.
pub async fn sweep_idle_sessions(state: &AppState, now: Instant) -> usize {
    let idle = state.config.session_idle;
    let mut sessions = state.sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, convo| convo.idle_for(now) <= idle);
    let expired = before - sessions.len();
    if expired > 0 {
        info!(expired, remaining = sessions.len(), "expired idle chat sessions");
    }
    expired
}

#[cfg(test)]
#[path = "sweeper_test.rs"]
mod tests;
