//! Driver configuration
//!
//! Settings are read from an optional JSON file. Every key is optional and
//! falls back to the defaults below, which match the stock node parameters.
//!
//! ```json
//! {
//!     "device": "/dev/ttyUSB0",
//!     "rate": 100,
//!     "use_fog": false
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tamagawa::{output_request, FrameVariant};
use thiserror::Error;

/// Errors loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings for the serial driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Serial device path
    pub device: String,
    /// Serial baud rate (8N1, no flow control)
    pub baud_rate: u32,
    /// IMU model designation, informational only
    pub imu_type: String,
    /// Output rate in Hz requested from the device at startup
    pub rate: u32,
    /// Unit has the FOG channel (extended frame layout)
    pub use_fog: bool,
    /// Frame identifier attached to published records
    pub frame_id: String,
    /// Interval between health reports, in seconds
    pub health_period_secs: f64,
    /// Record age after which the connection check fails, in seconds
    pub connection_timeout_secs: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyS0".to_string(),
            baud_rate: 115_200,
            imu_type: "noGPS".to_string(),
            rate: 50,
            use_fog: true,
            frame_id: "imu".to_string(),
            health_period_secs: 1.0,
            connection_timeout_secs: 1.0,
        }
    }
}

impl DriverConfig {
    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.is_empty() {
            return Err(ConfigError::Invalid {
                key: "device",
                reason: "must not be empty".to_string(),
            });
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid {
                key: "baud_rate",
                reason: "must be positive".to_string(),
            });
        }
        if self.rate == 0 {
            return Err(ConfigError::Invalid {
                key: "rate",
                reason: "must be positive".to_string(),
            });
        }
        seconds("health_period_secs", self.health_period_secs)?;
        seconds("connection_timeout_secs", self.connection_timeout_secs)?;
        Ok(())
    }

    /// Frame layout implied by `use_fog`
    pub fn variant(&self) -> FrameVariant {
        FrameVariant::from_use_fog(self.use_fog)
    }

    /// Output request sent once after opening the port
    pub fn handshake(&self) -> String {
        output_request(self.rate)
    }

    /// Health report interval. Values rejected by `validate` give the default.
    pub fn health_period(&self) -> Duration {
        seconds("health_period_secs", self.health_period_secs).unwrap_or(DEFAULT_PERIOD)
    }

    /// Connection timeout. Values rejected by `validate` give the default.
    pub fn connection_timeout(&self) -> Duration {
        seconds("connection_timeout_secs", self.connection_timeout_secs)
            .unwrap_or(DEFAULT_PERIOD)
    }
}

const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// Convert a seconds setting to a non-zero `Duration`
fn seconds(key: &'static str, value: f64) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { key, reason };

    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(format!(
            "must be a positive number of seconds, got {value}"
        )));
    }
    let duration =
        Duration::try_from_secs_f64(value).map_err(|e| invalid(format!("{value} s: {e}")))?;
    if duration.is_zero() {
        return Err(invalid(format!("{value} s rounds to zero")));
    }
    Ok(duration)
}
