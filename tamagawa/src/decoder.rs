//! Binary frame decoding
//!
//! A [`Decoder`] is built once for the configured variant and turns each
//! received line into a [`MeasurementRecord`] plus the device status word.

use nalgebra::Vector3;
use thiserror::Error;

use crate::field::{extract, FieldError};
use crate::frame::{validate, RawFrame};
use crate::layout::{Field, FrameLayout, FrameVariant};
use crate::orientation::Attitude;
use crate::record::MeasurementRecord;
use crate::status::StatusWord;
use crate::time::Timestamp;

/// Reasons a frame produces no record
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Mode tag is not `BIN,`. Expected for ASCII output and partial lines.
    #[error("frame is not a binary data frame")]
    UnrecognizedFrame,

    /// The frame ends before a field of the configured layout.
    #[error("frame too short: {0}")]
    OutOfRange(#[from] FieldError),
}

/// Result of decoding one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    pub record: MeasurementRecord,
    pub status: StatusWord,
}

/// Decoder for a fixed frame variant
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    layout: &'static FrameLayout,
}

impl Decoder {
    pub fn new(variant: FrameVariant) -> Self {
        Self {
            layout: FrameLayout::for_variant(variant),
        }
    }

    pub fn variant(&self) -> FrameVariant {
        self.layout.variant
    }

    /// Decode a frame stamped by the reader
    pub fn decode(&self, frame: &RawFrame) -> Result<DecodedFrame, DecodeError> {
        self.decode_bytes(frame.as_bytes(), frame.received_at())
    }

    /// Decode raw bytes, stamping the record with `timestamp`.
    ///
    /// The mode tag is checked before any field is read. A frame that fails
    /// the tag check yields [`DecodeError::UnrecognizedFrame`], one that is
    /// too short for the layout yields [`DecodeError::OutOfRange`].
    pub fn decode_bytes(
        &self,
        bytes: &[u8],
        timestamp: Timestamp,
    ) -> Result<DecodedFrame, DecodeError> {
        validate(bytes)?;

        let mut counter = 0u32;
        let mut status = StatusWord::empty();
        let mut angular_velocity = Vector3::zeros();
        let mut linear_acceleration = Vector3::zeros();
        let mut attitude = Attitude::default();

        for spec in self.layout.fields {
            let raw = extract(bytes, spec.offset, spec.width, spec.signed)?;

            match spec.field {
                Field::Counter => counter = (raw as u32) << self.layout.counter_shift,
                Field::Status => status = StatusWord::from_raw(raw as i16),
                Field::AngularVelocityX => angular_velocity.x = spec.apply_scale(raw),
                Field::AngularVelocityY => angular_velocity.y = spec.apply_scale(raw),
                Field::AngularVelocityZ => angular_velocity.z = spec.apply_scale(raw),
                Field::LinearAccelerationX => linear_acceleration.x = spec.apply_scale(raw),
                Field::LinearAccelerationY => linear_acceleration.y = spec.apply_scale(raw),
                Field::LinearAccelerationZ => linear_acceleration.z = spec.apply_scale(raw),
                Field::Roll => attitude.roll = spec.apply_scale(raw),
                Field::Pitch => attitude.pitch = spec.apply_scale(raw),
                Field::Yaw => attitude.yaw = spec.apply_scale(raw),
            }
        }

        let orientation = match self.layout.variant {
            FrameVariant::Extended => Some(attitude.to_quaternion()),
            FrameVariant::Standard => None,
        };

        Ok(DecodedFrame {
            record: MeasurementRecord {
                timestamp,
                counter,
                angular_velocity,
                linear_acceleration,
                orientation,
            },
            status,
        })
    }
}
