//! DPT 232.600 - RGB Colour (3 bytes)
//!
//! ## Format
//!
//! ```text
//! Byte 0: R (0-255)
//! Byte 1: G (0-255)
//! Byte 2: B (0-255)
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 232.xxx RGB colour types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt232 {
    /// DPT 232.600 - RGB colour
    Rgb,
}

impl Dpt232 {
    /// Resolve a minor tag number (e.g. `600` for `232.600`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            600 => Some(Dpt232::Rgb),
            _ => None,
        }
    }
}

/// An RGB colour value (DPT 232.600).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
}

impl DptEncode<Rgb> for Dpt232 {
    fn encode(&self, value: Rgb, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }
        buf[0] = value.r;
        buf[1] = value.g;
        buf[2] = value.b;
        Ok(3)
    }
}

impl DptDecode<Rgb> for Dpt232 {
    fn decode(&self, data: &[u8]) -> Result<Rgb> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }
        Ok(Rgb { r: data[0], g: data[1], b: data[2] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 3];
        let value = Rgb { r: 255, g: 128, b: 0 };
        Dpt232::Rgb.encode(value, &mut buf).unwrap();
        assert_eq!(buf, [255, 128, 0]);
        assert_eq!(Dpt232::Rgb.decode(&buf).unwrap(), value);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(Dpt232::Rgb.decode(&[0, 0]).is_err());
    }
}
