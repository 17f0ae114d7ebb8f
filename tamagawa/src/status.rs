//! Device status word

use bitflags::bitflags;

bitflags! {
    /// 16-bit status word reported in every binary frame.
    ///
    /// Only the built-in-test flag is documented; the remaining bits are kept
    /// as received.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusWord: u16 {
        /// Built-in test failure
        const BIT_ERROR = 1 << 15;
    }
}

impl StatusWord {
    /// Interpret the signed wire value
    pub fn from_raw(raw: i16) -> Self {
        Self::from_bits_retain(raw as u16)
    }

    /// Signed value as sent by the device
    pub fn raw(&self) -> i16 {
        self.bits() as i16
    }

    /// Returns true if the device reports a built-in test failure
    pub fn has_bit_error(&self) -> bool {
        self.contains(Self::BIT_ERROR)
    }
}

impl Default for StatusWord {
    fn default() -> Self {
        Self::empty()
    }
}
