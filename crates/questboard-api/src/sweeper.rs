//! Background sweep that discards idle sessions.

use std::time::Duration;

use questboard_sync::session::SessionStore;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawns a task that evicts sessions idle for longer than `max_idle`,
/// checking every `every`.
pub fn spawn_idle_sweeper(
    sessions: SessionStore,
    max_idle: chrono::Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(max_idle).await;
            if !evicted.is_empty() {
                info!(count = evicted.len(), "swept idle quest board sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use questboard_sync::session::SessionKey;
    use questboard_test_support::ManualClock;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_discards_sessions_once_idle() {
        // Arrange
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let sessions = SessionStore::new(clock.clone());
        let key = SessionKey::parse("board").unwrap();
        sessions.open(&key).await;

        let sweeper = spawn_idle_sweeper(
            sessions.clone(),
            chrono::Duration::minutes(30),
            Duration::from_secs(60),
        );

        // Act: paused time jumps straight to each timer. Sweeps run at 0s and
        // 60s, then at 120s once the session is past its idle timeout.
        tokio::time::sleep(Duration::from_secs(90)).await;
        let survived = sessions.get(&key).await.is_some();
        clock.advance(chrono::Duration::minutes(31));
        tokio::time::sleep(Duration::from_secs(60)).await;

        // Assert
        assert!(survived);
        assert!(sessions.get(&key).await.is_none());
        sweeper.abort();
    }
}
