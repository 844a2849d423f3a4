/// Background sweep of expired refresh tokens
///
/// Expired rows never resolve, so this only reclaims space.
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::RefreshTokenStore;

pub fn spawn_token_reaper(store: RefreshTokenStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = interval.as_secs(), "Refresh token reaper started");

        loop {
            ticker.tick().await;

            match store.purge_expired().await {
                Ok(0) => tracing::debug!("No expired refresh tokens to purge"),
                Ok(purged) => tracing::info!(purged, "Purged expired refresh tokens"),
                Err(e) => tracing::error!(error = %e, "Failed to purge expired refresh tokens"),
            }
        }
    })
}
