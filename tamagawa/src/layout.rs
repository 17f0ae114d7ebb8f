//! Payload layouts of the two binary frame variants
//!
//! Both variants share the leading counter and status words. The extended
//! (FOG) variant widens the Z gyro channel to 32 bits, which shifts the
//! accelerometer block by two bytes, and appends roll/pitch/yaw.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::field::FieldWidth::{self, Bits16, Bits32};
use Field::*;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Angular rate LSB for 16-bit channels: 200 deg/s full scale, in rad/s
pub const ANGULAR_RATE_LSB_16: f64 = 200.0 / 32768.0 * DEG_TO_RAD;

/// Angular rate LSB for the 32-bit FOG channel: 200 deg/s full scale, in rad/s
pub const ANGULAR_RATE_LSB_32: f64 = 200.0 / 2147483648.0 * DEG_TO_RAD;

/// Acceleration LSB: 100 m/s^2 full scale
pub const ACCELERATION_LSB: f64 = 100.0 / 32768.0;

/// Attitude LSB: 180 deg full scale, in rad
pub const ATTITUDE_LSB: f64 = 180.0 / 32768.0 * DEG_TO_RAD;

/// Device variant, fixed at startup from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameVariant {
    /// Three MEMS gyro channels, no attitude output
    Standard,
    /// Fiber-optic Z gyro channel plus attitude output
    Extended,
}

impl FrameVariant {
    /// Select the variant from the `use_fog` setting
    pub fn from_use_fog(use_fog: bool) -> Self {
        if use_fog {
            FrameVariant::Extended
        } else {
            FrameVariant::Standard
        }
    }

    /// Short label logged when the first frame is decoded
    pub fn mode_label(&self) -> &'static str {
        match self {
            FrameVariant::Standard => "BIN-w/oFOG",
            FrameVariant::Extended => "BIN-w/FOG",
        }
    }
}

/// Physical quantity carried by a payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Counter,
    Status,
    AngularVelocityX,
    AngularVelocityY,
    AngularVelocityZ,
    LinearAccelerationX,
    LinearAccelerationY,
    LinearAccelerationZ,
    Roll,
    Pitch,
    Yaw,
}

/// Location, encoding and scale of one payload field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub field: Field,
    /// Byte offset from the start of the frame
    pub offset: usize,
    pub width: FieldWidth,
    /// Two's complement when true
    pub signed: bool,
    /// Multiplier from raw counts to SI units
    pub scale: f64,
}

impl FieldSpec {
    const fn new(field: Field, offset: usize, width: FieldWidth, signed: bool, scale: f64) -> Self {
        Self {
            field,
            offset,
            width,
            signed,
            scale,
        }
    }

    /// First byte past this field
    pub const fn end(&self) -> usize {
        self.offset + self.width.bytes()
    }

    /// Convert a raw reading to physical units
    pub fn apply_scale(&self, raw: i64) -> f64 {
        raw as f64 * self.scale
    }
}

const STANDARD_FIELDS: [FieldSpec; 8] = [
    FieldSpec::new(Counter, 11, Bits16, false, 1.0),
    FieldSpec::new(Status, 13, Bits16, true, 1.0),
    FieldSpec::new(AngularVelocityX, 15, Bits16, true, ANGULAR_RATE_LSB_16),
    FieldSpec::new(AngularVelocityY, 17, Bits16, true, ANGULAR_RATE_LSB_16),
    FieldSpec::new(AngularVelocityZ, 19, Bits16, true, ANGULAR_RATE_LSB_16),
    FieldSpec::new(LinearAccelerationX, 21, Bits16, true, ACCELERATION_LSB),
    FieldSpec::new(LinearAccelerationY, 23, Bits16, true, ACCELERATION_LSB),
    FieldSpec::new(LinearAccelerationZ, 25, Bits16, true, ACCELERATION_LSB),
];

// Pitch and yaw are reported with the opposite sign convention.
const EXTENDED_FIELDS: [FieldSpec; 11] = [
    FieldSpec::new(Counter, 11, Bits16, false, 1.0),
    FieldSpec::new(Status, 13, Bits16, true, 1.0),
    FieldSpec::new(AngularVelocityX, 15, Bits16, true, ANGULAR_RATE_LSB_16),
    FieldSpec::new(AngularVelocityY, 17, Bits16, true, ANGULAR_RATE_LSB_16),
    FieldSpec::new(AngularVelocityZ, 19, Bits32, true, ANGULAR_RATE_LSB_32),
    FieldSpec::new(LinearAccelerationX, 23, Bits16, true, ACCELERATION_LSB),
    FieldSpec::new(LinearAccelerationY, 25, Bits16, true, ACCELERATION_LSB),
    FieldSpec::new(LinearAccelerationZ, 27, Bits16, true, ACCELERATION_LSB),
    FieldSpec::new(Roll, 29, Bits16, true, ATTITUDE_LSB),
    FieldSpec::new(Pitch, 31, Bits16, true, -ATTITUDE_LSB),
    FieldSpec::new(Yaw, 33, Bits16, true, -ATTITUDE_LSB),
];

/// Field table for one frame variant
#[derive(Debug, Clone, Copy)]
pub struct FrameLayout {
    pub variant: FrameVariant,
    pub fields: &'static [FieldSpec],
    /// Left shift applied to the counter word. The FOG unit only sends the
    /// upper half of its 32-bit counter.
    pub counter_shift: u32,
}

/// Layout of a standard frame
pub const STANDARD_LAYOUT: FrameLayout = FrameLayout {
    variant: FrameVariant::Standard,
    fields: &STANDARD_FIELDS,
    counter_shift: 0,
};

/// Layout of an extended (FOG) frame
pub const EXTENDED_LAYOUT: FrameLayout = FrameLayout {
    variant: FrameVariant::Extended,
    fields: &EXTENDED_FIELDS,
    counter_shift: 16,
};

impl FrameLayout {
    pub fn for_variant(variant: FrameVariant) -> &'static FrameLayout {
        match variant {
            FrameVariant::Standard => &STANDARD_LAYOUT,
            FrameVariant::Extended => &EXTENDED_LAYOUT,
        }
    }

    /// Shortest frame that holds every field of this layout
    pub fn min_frame_len(&self) -> usize {
        self.fields.iter().map(FieldSpec::end).max().unwrap_or(0)
    }

    /// Look up the spec for a field, if this layout carries it
    pub fn spec(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }
}
