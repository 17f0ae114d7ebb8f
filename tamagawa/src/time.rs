//! Host-side timestamps for received frames
//!
//! The device does not put a usable clock in its frames, so every record is
//! stamped with the host wall clock at the moment its delimiter arrived.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock time as seconds and nanoseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch
    pub seconds: u64,
    /// Sub-second part in nanoseconds (always < 1e9)
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp from seconds and nanoseconds.
    ///
    /// Nanoseconds above one second are carried into `seconds`.
    pub fn new(seconds: u64, nanos: u32) -> Self {
        let carry = (nanos / 1_000_000_000) as u64;
        Self {
            seconds: seconds + carry,
            nanos: nanos % 1_000_000_000,
        }
    }

    /// Current host wall-clock time
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Duration since the Unix epoch
    pub fn as_duration(&self) -> Duration {
        Duration::new(self.seconds, self.nanos)
    }

    /// Seconds since the Unix epoch as a float
    pub fn as_secs_f64(&self) -> f64 {
        self.as_duration().as_secs_f64()
    }

    /// How old this timestamp is at `now`.
    ///
    /// Saturates to zero if `now` is earlier (host clock stepped backwards).
    pub fn age_at(&self, now: Timestamp) -> Duration {
        now.as_duration().saturating_sub(self.as_duration())
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            seconds: since_epoch.as_secs(),
            nanos: since_epoch.subsec_nanos(),
        }
    }
}

impl From<Duration> for Timestamp {
    fn from(since_epoch: Duration) -> Self {
        Self {
            seconds: since_epoch.as_secs(),
            nanos: since_epoch.subsec_nanos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_nanos() {
        let ts = Timestamp::new(10, 1_500_000_000);
        assert_eq!(ts.seconds, 11);
        assert_eq!(ts.nanos, 500_000_000);
    }

    #[test]
    fn test_age_at() {
        let earlier = Timestamp::new(100, 250_000_000);
        let later = Timestamp::new(101, 500_000_000);
        assert_eq!(earlier.age_at(later), Duration::from_millis(1250));
    }

    #[test]
    fn test_age_saturates_when_clock_goes_backwards() {
        let earlier = Timestamp::new(100, 0);
        let later = Timestamp::new(101, 0);
        assert_eq!(later.age_at(earlier), Duration::ZERO);
    }

    #[test]
    fn test_from_system_time() {
        let time = UNIX_EPOCH + Duration::new(42, 7);
        let ts = Timestamp::from(time);
        assert_eq!(ts, Timestamp::new(42, 7));
        assert_eq!(ts.as_duration(), Duration::new(42, 7));
    }
}
