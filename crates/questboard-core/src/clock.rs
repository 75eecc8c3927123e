//! Clock abstraction so session activity can be stamped deterministically.

use chrono::{DateTime, Duration, Utc};

/// Source of the current time for sessions and cycle reports.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns how long ago `since` was, clamped to zero for future instants.
    fn elapsed_since(&self, since: DateTime<Utc>) -> Duration {
        (self.now() - since).max(Duration::zero())
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    struct At(DateTime<Utc>);

    impl Clock for At {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_elapsed_since_measures_past_instants() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = At(now);

        let elapsed = clock.elapsed_since(now - Duration::seconds(90));

        assert_eq!(elapsed, Duration::seconds(90));
    }

    #[test]
    fn test_elapsed_since_clamps_future_instants_to_zero() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = At(now);

        let elapsed = clock.elapsed_since(now + Duration::seconds(5));

        assert_eq!(elapsed, Duration::zero());
    }
}
