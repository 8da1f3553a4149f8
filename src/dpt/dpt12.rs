//! DPT 12.001 - 4-byte Unsigned Value (4 bytes)
//!
//! Big-endian unsigned, 0 to 4294967295.
//!
//! ## Common Subtypes
//!
//! - **12.001** - Counter pulses (unsigned)

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 12.xxx 32-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt12 {
    /// DPT 12.001 - Counter pulses (unsigned)
    Counter,
}

impl Dpt12 {
    /// Get the DPT identifier string (e.g., "12.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt12::Counter => "12.001",
        }
    }

    /// Resolve a minor tag number (e.g. `1` for `12.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt12::Counter),
            _ => None,
        }
    }
}

impl DptEncode<u32> for Dpt12 {
    fn encode(&self, value: u32, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 4 {
            return Err(KnxError::buffer_too_small());
        }
        buf[..4].copy_from_slice(&value.to_be_bytes());
        Ok(4)
    }
}

impl DptDecode<u32> for Dpt12 {
    fn decode(&self, data: &[u8]) -> Result<u32> {
        if data.len() < 4 {
            return Err(KnxError::invalid_dpt_data());
        }
        Ok(u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_max() {
        let mut buf = [0u8; 4];
        Dpt12::Counter.encode(u32::MAX, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Dpt12::Counter.decode(&buf).unwrap(), u32::MAX);
    }

    #[test]
    fn test_round_trip_zero() {
        let mut buf = [0u8; 4];
        Dpt12::Counter.encode(0, &mut buf).unwrap();
        assert_eq!(Dpt12::Counter.decode(&buf).unwrap(), 0);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(Dpt12::Counter.decode(&[0, 0, 0]).is_err());
    }
}
