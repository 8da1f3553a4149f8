//! DPT 8.xxx - 16-bit Signed Value (2 bytes)
//!
//! Big-endian two's complement, -32768 to 32767.
//!
//! ## Common Subtypes
//!
//! - **8.001** - Pulses difference (signed)
//! - **8.002** - Time lag (signed, 10 ms resolution)
//! - **8.003** - Delta time (signed, 10 ms resolution)
//! - **8.005** - Delta time (signed, seconds)
//! - **8.010** - Percent (signed, 0.01% resolution)
//! - **8.011** - Rotation angle (signed degrees)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt8, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 2];
//! let n = Dpt8::DeltaTimeSec.encode(-1000, &mut buf)?;
//! let value = Dpt8::DeltaTimeSec.decode(&buf[..n])?;
//! assert_eq!(value, -1000);
//! # Ok::<(), knx_pico::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 8.xxx 16-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt8 {
    /// DPT 8.001 - Pulses difference (signed)
    PulsesDifference,
    /// DPT 8.002 - Time lag (signed, 10 ms)
    TimeLagMs,
    /// DPT 8.003 - Delta time, 10 ms resolution
    DeltaTime10Ms,
    /// DPT 8.005 - Delta time, seconds
    DeltaTimeSec,
    /// DPT 8.010 - Percent, 0.01% resolution
    PercentV16,
    /// DPT 8.011 - Rotation angle, degrees
    RotationAngle,
}

impl Dpt8 {
    /// Get the DPT identifier string (e.g., "8.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt8::PulsesDifference => "8.001",
            Dpt8::TimeLagMs => "8.002",
            Dpt8::DeltaTime10Ms => "8.003",
            Dpt8::DeltaTimeSec => "8.005",
            Dpt8::PercentV16 => "8.010",
            Dpt8::RotationAngle => "8.011",
        }
    }

    /// Resolve a minor tag number (e.g. `1` for `8.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt8::PulsesDifference),
            2 => Some(Dpt8::TimeLagMs),
            3 => Some(Dpt8::DeltaTime10Ms),
            5 => Some(Dpt8::DeltaTimeSec),
            10 => Some(Dpt8::PercentV16),
            11 => Some(Dpt8::RotationAngle),
            _ => None,
        }
    }
}

impl DptEncode<i16> for Dpt8 {
    fn encode(&self, value: i16, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }
        buf[..2].copy_from_slice(&value.to_be_bytes());
        Ok(2)
    }
}

impl DptDecode<i16> for Dpt8 {
    fn decode(&self, data: &[u8]) -> Result<i16> {
        if data.len() < 2 {
            return Err(KnxError::invalid_dpt_data());
        }
        Ok(i16::from_be_bytes([data[0], data[1]]))
    }
}
