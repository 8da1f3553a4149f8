//! DPT 29.xxx - 64-bit Signed Value (8 bytes)
//!
//! Big-endian two's complement.
//!
//! ## Common Subtypes
//!
//! - **29.010** - Active energy (Wh, signed)
//! - **29.011** - Apparent energy (VAh, signed)
//! - **29.012** - Reactive energy (VArh, signed)

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 29.xxx 64-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt29 {
    /// DPT 29.010 - Active energy, Wh (signed)
    ActiveEnergy,
    /// DPT 29.011 - Apparent energy, VAh (signed)
    ApparentEnergy,
    /// DPT 29.012 - Reactive energy, VArh (signed)
    ReactiveEnergy,
}

impl Dpt29 {
    /// Get the DPT identifier string (e.g., "29.010")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt29::ActiveEnergy => "29.010",
            Dpt29::ApparentEnergy => "29.011",
            Dpt29::ReactiveEnergy => "29.012",
        }
    }

    /// Resolve a minor tag number (e.g. `10` for `29.010`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            10 => Some(Dpt29::ActiveEnergy),
            11 => Some(Dpt29::ApparentEnergy),
            12 => Some(Dpt29::ReactiveEnergy),
            _ => None,
        }
    }
}

impl DptEncode<i64> for Dpt29 {
    fn encode(&self, value: i64, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 8 {
            return Err(KnxError::buffer_too_small());
        }
        buf[..8].copy_from_slice(&value.to_be_bytes());
        Ok(8)
    }
}

impl DptDecode<i64> for Dpt29 {
    fn decode(&self, data: &[u8]) -> Result<i64> {
        if data.len() < 8 {
            return Err(KnxError::invalid_dpt_data());
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&data[..8]);
        Ok(i64::from_be_bytes(bytes))
    }
}
