//! Attitude angles and their quaternion form

use nalgebra::UnitQuaternion;

/// Roll, pitch and yaw in radians, as decoded from an extended frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    /// Rotation about body X
    pub roll: f64,
    /// Rotation about body Y
    pub pitch: f64,
    /// Rotation about body Z
    pub yaw: f64,
}

impl Attitude {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Unit quaternion for this attitude, see [`quaternion_from_rpy`]
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        quaternion_from_rpy(self.roll, self.pitch, self.yaw)
    }
}

/// Compose roll, pitch and yaw into a unit quaternion.
///
/// Rotations are applied about X, then Y, then Z, i.e.
/// `q = qz(yaw) * qy(pitch) * qx(roll)`.
pub fn quaternion_from_rpy(roll: f64, pitch: f64, yaw: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(roll, pitch, yaw)
}
