//! Tamagawa IMU binary protocol decoding
//!
//! This crate turns binary-mode output lines from a Tamagawa IMU into
//! calibrated measurements (angular velocity, linear acceleration and, for
//! units with a fiber-optic gyro channel, attitude) plus the device status
//! word. It performs no I/O; see the `imu-driver` crate for the serial side.
//!
//! ```
//! use tamagawa::{build_frame, Decoder, FrameVariant, ImuSample, Timestamp};
//!
//! let bytes = build_frame(FrameVariant::Standard, &ImuSample::default());
//! let decoded = Decoder::new(FrameVariant::Standard)
//!     .decode_bytes(&bytes, Timestamp::now())
//!     .unwrap();
//! assert!(decoded.record.orientation.is_none());
//! ```

pub mod decoder;
pub mod field;
pub mod frame;
pub mod health;
pub mod layout;
pub mod mock;
pub mod orientation;
pub mod record;
pub mod status;
pub mod time;

pub use decoder::{DecodeError, DecodedFrame, Decoder};
pub use field::{extract, read_i16, read_i32, read_u16, FieldError, FieldWidth};
pub use frame::{is_binary_frame, output_request, RawFrame, BINARY_TAG, DELIMITER, TAG_OFFSET};
pub use health::{
    check_bit_error, check_connection, HealthCheck, HealthReport, HealthStatus,
    CONNECTION_TIMEOUT, HARDWARE_ID,
};
pub use layout::{Field, FieldSpec, FrameLayout, FrameVariant, EXTENDED_LAYOUT, STANDARD_LAYOUT};
pub use mock::{build_frame, ImuSample};
pub use orientation::{quaternion_from_rpy, Attitude};
pub use record::MeasurementRecord;
pub use status::StatusWord;
pub use time::Timestamp;
