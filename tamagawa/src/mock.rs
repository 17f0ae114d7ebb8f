//! Synthetic binary frame generation
//!
//! Builds frames from physical values by inverting the scale of each field,
//! for tests and for driving the pipeline without hardware.

use nalgebra::Vector3;

use crate::field::FieldWidth;
use crate::frame::{BINARY_TAG, PAYLOAD_OFFSET, PREFIX};
use crate::layout::{Field, FieldSpec, FrameLayout, FrameVariant};
use crate::orientation::Attitude;
use crate::status::StatusWord;

/// Physical values to encode into a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// Device counter. The extended layout only carries the upper 16 bits.
    pub counter: u32,
    pub status: StatusWord,
    /// rad/s
    pub angular_velocity: Vector3<f64>,
    /// m/s^2
    pub linear_acceleration: Vector3<f64>,
    /// Ignored by the standard layout
    pub attitude: Attitude,
}

impl Default for ImuSample {
    fn default() -> Self {
        Self {
            counter: 0,
            status: StatusWord::empty(),
            angular_velocity: Vector3::zeros(),
            linear_acceleration: Vector3::zeros(),
            attitude: Attitude::default(),
        }
    }
}

/// Build a complete frame, including `$TSC,BIN,` header and CRLF trailer.
///
/// Values are rounded to the nearest LSB and saturate at the field's range.
/// The two header bytes after the tag carry the payload length.
pub fn build_frame(variant: FrameVariant, sample: &ImuSample) -> Vec<u8> {
    let layout = FrameLayout::for_variant(variant);
    let len = layout.min_frame_len();

    let mut frame = vec![0u8; len];
    frame[..PREFIX.len()].copy_from_slice(PREFIX);
    frame[PREFIX.len()..PREFIX.len() + BINARY_TAG.len()].copy_from_slice(BINARY_TAG);
    let payload_len = (len - PAYLOAD_OFFSET) as u16;
    frame[PREFIX.len() + BINARY_TAG.len()..PAYLOAD_OFFSET]
        .copy_from_slice(&payload_len.to_be_bytes());

    for spec in layout.fields {
        let raw = raw_value(spec, layout, sample);
        write_field(&mut frame, spec, raw);
    }

    frame.extend_from_slice(b"\r\n");
    frame
}

fn raw_value(spec: &FieldSpec, layout: &FrameLayout, sample: &ImuSample) -> i64 {
    let physical = match spec.field {
        Field::Counter => return (sample.counter >> layout.counter_shift) as i64,
        Field::Status => return sample.status.raw() as i64,
        Field::AngularVelocityX => sample.angular_velocity.x,
        Field::AngularVelocityY => sample.angular_velocity.y,
        Field::AngularVelocityZ => sample.angular_velocity.z,
        Field::LinearAccelerationX => sample.linear_acceleration.x,
        Field::LinearAccelerationY => sample.linear_acceleration.y,
        Field::LinearAccelerationZ => sample.linear_acceleration.z,
        Field::Roll => sample.attitude.roll,
        Field::Pitch => sample.attitude.pitch,
        Field::Yaw => sample.attitude.yaw,
    };

    let (min, max) = match spec.width {
        FieldWidth::Bits16 => (i16::MIN as f64, i16::MAX as f64),
        FieldWidth::Bits32 => (i32::MIN as f64, i32::MAX as f64),
    };
    (physical / spec.scale).round().clamp(min, max) as i64
}

fn write_field(frame: &mut [u8], spec: &FieldSpec, raw: i64) {
    let end = spec.end();
    match spec.width {
        FieldWidth::Bits16 => frame[spec.offset..end].copy_from_slice(&(raw as u16).to_be_bytes()),
        FieldWidth::Bits32 => frame[spec.offset..end].copy_from_slice(&(raw as u32).to_be_bytes()),
    }
}
