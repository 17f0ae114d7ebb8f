//! Decoded measurement output

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::layout::FrameVariant;
use crate::time::Timestamp;

/// One calibrated IMU sample.
///
/// `orientation` is present exactly when the frame was decoded with the
/// extended variant. Standard frames carry no attitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Host time at which the frame was received
    pub timestamp: Timestamp,
    /// Device sample counter
    pub counter: u32,
    /// Angular velocity in rad/s
    pub angular_velocity: Vector3<f64>,
    /// Linear acceleration in m/s^2
    pub linear_acceleration: Vector3<f64>,
    /// Attitude, extended variant only
    pub orientation: Option<UnitQuaternion<f64>>,
}

impl MeasurementRecord {
    /// Variant this record was decoded with
    pub fn variant(&self) -> FrameVariant {
        if self.orientation.is_some() {
            FrameVariant::Extended
        } else {
            FrameVariant::Standard
        }
    }

    /// Orientation, or identity for standard records.
    ///
    /// The identity returned for standard records is a placeholder for
    /// consumers that need a quaternion and carries no attitude information.
    pub fn orientation_or_identity(&self) -> UnitQuaternion<f64> {
        self.orientation.unwrap_or_else(UnitQuaternion::identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_record() -> MeasurementRecord {
        MeasurementRecord {
            timestamp: Timestamp::new(1, 0),
            counter: 7,
            angular_velocity: Vector3::new(0.1, 0.2, 0.3),
            linear_acceleration: Vector3::new(0.0, 0.0, 9.8),
            orientation: None,
        }
    }

    #[test]
    fn test_standard_orientation_placeholder() {
        let record = standard_record();
        assert_eq!(record.variant(), FrameVariant::Standard);
        assert_eq!(record.orientation_or_identity(), UnitQuaternion::identity());
    }

    #[test]
    fn test_serialization() {
        let record = standard_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: MeasurementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert!(json.contains("\"orientation\":null"));
    }
}
