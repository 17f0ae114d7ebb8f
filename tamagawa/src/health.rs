//! Health evaluation from the latest status word and sample age
//!
//! Two checks are reported independently on every health tick:
//!
//! - `imu_bit_error`: bit 15 of the last status word
//! - `imu_connection`: age of the last record against a timeout
//!
//! They are never folded into a single code; one may fire without the other.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::status::StatusWord;
use crate::time::Timestamp;

/// Hardware identifier attached to health reports
pub const HARDWARE_ID: &str = "tamagawa";

/// Default age after which the connection is considered lost
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome of a single health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Ok,
    /// Device reported a built-in test failure
    BitError,
    /// No record newer than the timeout
    ConnectionTimeout,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }

    /// Summary text for the report
    pub fn message(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "OK",
            HealthStatus::BitError => "Built-In Test error",
            HealthStatus::ConnectionTimeout => "Message timeout",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Which check a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthCheck {
    BitError,
    Connection,
}

impl HealthCheck {
    /// Name the report is published under
    pub fn name(&self) -> &'static str {
        match self {
            HealthCheck::BitError => "imu_bit_error",
            HealthCheck::Connection => "imu_connection",
        }
    }
}

/// One check's result for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub check: HealthCheck,
    pub status: HealthStatus,
}

impl HealthReport {
    pub fn new(check: HealthCheck, status: HealthStatus) -> Self {
        Self { check, status }
    }
}

/// Built-in test check on the last status word
pub fn check_bit_error(status: StatusWord) -> HealthStatus {
    if status.has_bit_error() {
        HealthStatus::BitError
    } else {
        HealthStatus::Ok
    }
}

/// Staleness check on the last record's timestamp.
///
/// Reports a timeout when `now - last` exceeds `timeout`, or when no record
/// has been received yet.
pub fn check_connection(
    last: Option<Timestamp>,
    now: Timestamp,
    timeout: Duration,
) -> HealthStatus {
    match last {
        Some(last) if last.age_at(now) <= timeout => HealthStatus::Ok,
        _ => HealthStatus::ConnectionTimeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_error_check() {
        assert_eq!(check_bit_error(StatusWord::from_raw(-1)), HealthStatus::BitError);
        assert_eq!(check_bit_error(StatusWord::from_raw(0x1234)), HealthStatus::Ok);
    }

    #[test]
    fn test_connection_fresh() {
        let last = Timestamp::new(100, 0);
        let now = Timestamp::new(100, 900_000_000);
        assert_eq!(
            check_connection(Some(last), now, CONNECTION_TIMEOUT),
            HealthStatus::Ok
        );
    }

    #[test]
    fn test_connection_boundary_is_ok() {
        let last = Timestamp::new(100, 0);
        let now = Timestamp::new(101, 0);
        assert_eq!(
            check_connection(Some(last), now, CONNECTION_TIMEOUT),
            HealthStatus::Ok
        );
    }

    #[test]
    fn test_connection_stale() {
        let last = Timestamp::new(100, 0);
        let now = Timestamp::new(101, 1);
        assert_eq!(
            check_connection(Some(last), now, CONNECTION_TIMEOUT),
            HealthStatus::ConnectionTimeout
        );
    }

    #[test]
    fn test_connection_without_samples() {
        assert_eq!(
            check_connection(None, Timestamp::new(0, 0), CONNECTION_TIMEOUT),
            HealthStatus::ConnectionTimeout
        );
    }

    #[test]
    fn test_checks_are_independent() {
        // Fresh data with a BIT failure
        let now = Timestamp::new(50, 0);
        let status = StatusWord::BIT_ERROR;
        assert_eq!(check_bit_error(status), HealthStatus::BitError);
        assert!(check_connection(Some(now), now, CONNECTION_TIMEOUT).is_ok());

        // Stale data with a healthy status word
        let stale = Timestamp::new(10, 0);
        assert!(check_bit_error(StatusWord::empty()).is_ok());
        assert_eq!(
            check_connection(Some(stale), now, CONNECTION_TIMEOUT),
            HealthStatus::ConnectionTimeout
        );
    }

    #[test]
    fn test_report_names_and_messages() {
        assert_eq!(HealthCheck::BitError.name(), "imu_bit_error");
        assert_eq!(HealthCheck::Connection.name(), "imu_connection");
        assert_eq!(HealthStatus::BitError.to_string(), "Built-In Test error");
        assert_eq!(HealthStatus::ConnectionTimeout.message(), "Message timeout");
    }
}
