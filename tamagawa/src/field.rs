//! Big-endian integer field extraction
//!
//! Every numeric field in a binary frame sits at a fixed offset and is sent
//! most significant byte first. Reads are bounds checked against the frame
//! so a truncated line can never cause an out-of-bounds access.

use thiserror::Error;

/// Width of an integer field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// Two bytes
    Bits16,
    /// Four bytes
    Bits32,
}

impl FieldWidth {
    /// Number of bytes occupied by the field
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::Bits16 => 2,
            FieldWidth::Bits32 => 4,
        }
    }

    /// Number of bits occupied by the field
    pub const fn bits(self) -> u32 {
        match self {
            FieldWidth::Bits16 => 16,
            FieldWidth::Bits32 => 32,
        }
    }
}

/// Field extraction error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The requested field extends past the end of the frame.
    #[error("field at offset {offset} ({width} bits) exceeds frame of {len} bytes")]
    OutOfRange {
        offset: usize,
        width: u32,
        len: usize,
    },
}

/// Read an integer field from `frame`.
///
/// Bytes are combined most significant first. When `signed` is true the
/// value is interpreted as two's complement of the given width, otherwise it
/// is zero extended.
pub fn extract(
    frame: &[u8],
    offset: usize,
    width: FieldWidth,
    signed: bool,
) -> Result<i64, FieldError> {
    let bytes = field_bytes(frame, offset, width)?;

    let value = match (width, signed) {
        (FieldWidth::Bits16, false) => u16::from_be_bytes([bytes[0], bytes[1]]) as i64,
        (FieldWidth::Bits16, true) => i16::from_be_bytes([bytes[0], bytes[1]]) as i64,
        (FieldWidth::Bits32, false) => {
            u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64
        }
        (FieldWidth::Bits32, true) => {
            i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64
        }
    };

    Ok(value)
}

/// Read an unsigned 16-bit field
pub fn read_u16(frame: &[u8], offset: usize) -> Result<u16, FieldError> {
    let b = field_bytes(frame, offset, FieldWidth::Bits16)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

/// Read a signed 16-bit field
pub fn read_i16(frame: &[u8], offset: usize) -> Result<i16, FieldError> {
    let b = field_bytes(frame, offset, FieldWidth::Bits16)?;
    Ok(i16::from_be_bytes([b[0], b[1]]))
}

/// Read a signed 32-bit field
pub fn read_i32(frame: &[u8], offset: usize) -> Result<i32, FieldError> {
    let b = field_bytes(frame, offset, FieldWidth::Bits32)?;
    Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn field_bytes(frame: &[u8], offset: usize, width: FieldWidth) -> Result<&[u8], FieldError> {
    let out_of_range = FieldError::OutOfRange {
        offset,
        width: width.bits(),
        len: frame.len(),
    };

    let end = offset.checked_add(width.bytes()).ok_or(out_of_range)?;
    frame.get(offset..end).ok_or(out_of_range)
}
