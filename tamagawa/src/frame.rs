//! Line framing and tag validation for Tamagawa binary output
//!
//! In binary mode the IMU emits one line per sample:
//!
//! ```text
//! offset  0-4   "$TSC,"
//! offset  5-8   "BIN,"          (mode tag)
//! offset  9-10  device header   (not interpreted)
//! offset 11..   big-endian payload, layout depends on the variant
//! trailer       "\r\n"
//! ```
//!
//! Lines whose tag is not `BIN,` (ASCII mode output, partial lines after a
//! resync) are dropped without being reported as errors.

use std::fmt;

use crate::decoder::DecodeError;
use crate::time::Timestamp;

/// Line delimiter terminating every frame
pub const DELIMITER: u8 = b'\n';

/// Sentence prefix sent by the device
pub const PREFIX: &[u8; 5] = b"$TSC,";

/// Mode tag identifying a binary data frame
pub const BINARY_TAG: &[u8; 4] = b"BIN,";

/// Offset of the mode tag within a frame
pub const TAG_OFFSET: usize = 5;

/// Offset of the first payload byte
pub const PAYLOAD_OFFSET: usize = 11;

/// One delimiter-terminated line received from the device.
///
/// Holds the bytes up to and including the delimiter and the host time at
/// which the delimiter arrived. Nothing about the content is checked until
/// it is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Vec<u8>,
    received_at: Timestamp,
}

impl RawFrame {
    /// Wrap bytes received at `received_at`
    pub fn new(bytes: Vec<u8>, received_at: Timestamp) -> Self {
        Self { bytes, received_at }
    }

    /// Frame contents including the delimiter
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Host time at which the frame was completed
    pub fn received_at(&self) -> Timestamp {
        self.received_at
    }

    /// Number of bytes in the frame
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the frame holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check whether this is a binary-mode data frame
    pub fn is_binary(&self) -> bool {
        is_binary_frame(&self.bytes)
    }

    /// Consume the frame and return its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Check the mode tag at bytes 5-8.
///
/// Frames too short to hold the tag do not match.
pub fn is_binary_frame(bytes: &[u8]) -> bool {
    bytes
        .get(TAG_OFFSET..TAG_OFFSET + BINARY_TAG.len())
        .is_some_and(|tag| tag == BINARY_TAG)
}

/// Accept a frame for decoding only if it carries the binary mode tag
pub fn validate(bytes: &[u8]) -> Result<(), DecodeError> {
    if is_binary_frame(bytes) {
        Ok(())
    } else {
        Err(DecodeError::UnrecognizedFrame)
    }
}

/// Build the request that switches the device to binary output.
///
/// `rate` is written verbatim as the output rate in Hz, so `50` gives
/// `"$TSC,BIN,50\r\n"` and `"050"` gives `"$TSC,BIN,050\r\n"`.
pub fn output_request(rate: impl fmt::Display) -> String {
    format!("$TSC,BIN,{rate}\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_tag_accepted() {
        let frame = b"$TSC,BIN,\x00\x1e\x00\x01\r\n";
        assert!(is_binary_frame(frame));
    }

    #[test]
    fn test_ascii_frame_rejected() {
        assert!(!is_binary_frame(b"$TSC,ASC,12,34,56\r\n"));
    }

    #[test]
    fn test_short_frames_do_not_match() {
        assert!(!is_binary_frame(b""));
        assert!(!is_binary_frame(b"\n"));
        assert!(!is_binary_frame(b"$TSC,BIN"));
        // Exactly nine bytes is enough to hold the tag
        assert!(is_binary_frame(b"$TSC,BIN,"));
    }

    #[test]
    fn test_tag_position_is_fixed() {
        // Tag shifted by one byte is not accepted
        assert!(!is_binary_frame(b"x$TSC,BIN,\r\n"));
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(b"$TSC,BIN,\x00\x10\r\n"), Ok(()));
        assert_eq!(
            validate(b"$TSC,ASC,1,2,3\r\n"),
            Err(DecodeError::UnrecognizedFrame)
        );
        assert_eq!(validate(b"$TSC"), Err(DecodeError::UnrecognizedFrame));
    }

    #[test]
    fn test_output_request() {
        assert_eq!(output_request(50), "$TSC,BIN,50\r\n");
        assert_eq!(output_request(200).as_bytes().last(), Some(&DELIMITER));
        assert_eq!(output_request("050"), "$TSC,BIN,050\r\n");
    }

    #[test]
    fn test_raw_frame_accessors() {
        let ts = Timestamp::new(5, 0);
        let frame = RawFrame::new(b"$TSC,BIN,xx\n".to_vec(), ts);
        assert_eq!(frame.len(), 12);
        assert!(!frame.is_empty());
        assert!(frame.is_binary());
        assert_eq!(frame.received_at(), ts);
        assert_eq!(frame.into_bytes().last(), Some(&DELIMITER));
    }
}
