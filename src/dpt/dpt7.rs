//! DPT 7.xxx - 2-byte Unsigned Value (2 bytes)
//!
//! 16-bit unsigned datapoint types represent values from 0 to 65535.
//!
//! ## Format
//!
//! - 16 bits: unsigned value (0-65535), big-endian
//!
//! ## Common Subtypes
//!
//! - **7.001** - Pulses (0-65535)
//! - **7.002** - Time Period (ms)
//! - **7.003** - Time Period (10ms)
//! - **7.004** - Time Period (100ms)
//! - **7.005** - Time Period (s)
//! - **7.006** - Time Period (min)
//! - **7.007** - Time Period (h)
//! - **7.010** - Property Data Type
//! - **7.011** - Length (mm)
//! - **7.012** - Current (mA)
//! - **7.013** - Brightness (lux)
//! - **7.600** - Color Temperature (K)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt7, DptDecode, DptEncode};
//!
//! // Decode brightness in lux
//! let lux = Dpt7::Brightness.decode(&[0x13, 0x88])?;  // 5000 lux
//!
//! // Encode pulses using trait
//! let mut buf = [0u8; 2];
//! let len = Dpt7::Pulses.encode(1234, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x04, 0xD2]);
//!
//! // Color temperature
//! let kelvin = Dpt7::ColorTemperature.decode(&[0x0F, 0xA0])?;  // 4000K
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 7.xxx 16-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt7 {
    /// DPT 7.001 - Pulses (0-65535)
    Pulses,
    /// DPT 7.002 - Time Period (ms)
    TimePeriodMs,
    /// DPT 7.003 - Time Period (10ms)
    TimePeriod10Ms,
    /// DPT 7.004 - Time Period (100ms)
    TimePeriod100Ms,
    /// DPT 7.005 - Time Period (s)
    TimePeriodSec,
    /// DPT 7.006 - Time Period (min)
    TimePeriodMin,
    /// DPT 7.007 - Time Period (h)
    TimePeriodHr,
    /// DPT 7.010 - Property Data Type
    PropDataType,
    /// DPT 7.011 - Length (mm)
    LengthMm,
    /// DPT 7.012 - Current (mA)
    CurrentMa,
    /// DPT 7.013 - Brightness (lux)
    Brightness,
    /// DPT 7.600 - Color Temperature (K)
    ColorTemperature,
}

impl Dpt7 {
    /// Get the DPT identifier string (e.g., "7.001")
    #[inline]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt7::Pulses => "7.001",
            Dpt7::TimePeriodMs => "7.002",
            Dpt7::TimePeriod10Ms => "7.003",
            Dpt7::TimePeriod100Ms => "7.004",
            Dpt7::TimePeriodSec => "7.005",
            Dpt7::TimePeriodMin => "7.006",
            Dpt7::TimePeriodHr => "7.007",
            Dpt7::PropDataType => "7.010",
            Dpt7::LengthMm => "7.011",
            Dpt7::CurrentMa => "7.012",
            Dpt7::Brightness => "7.013",
            Dpt7::ColorTemperature => "7.600",
        }
    }

    /// Resolve a minor tag number (e.g. `1` for `7.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt7::Pulses),
            2 => Some(Dpt7::TimePeriodMs),
            3 => Some(Dpt7::TimePeriod10Ms),
            4 => Some(Dpt7::TimePeriod100Ms),
            5 => Some(Dpt7::TimePeriodSec),
            6 => Some(Dpt7::TimePeriodMin),
            7 => Some(Dpt7::TimePeriodHr),
            10 => Some(Dpt7::PropDataType),
            11 => Some(Dpt7::LengthMm),
            12 => Some(Dpt7::CurrentMa),
            13 => Some(Dpt7::Brightness),
            600 => Some(Dpt7::ColorTemperature),
            _ => None,
        }
    }

    /// Get the unit string for this DPT
    #[inline]
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt7::Pulses => "pulses",
            Dpt7::TimePeriodMs => "ms",
            Dpt7::TimePeriod10Ms => "ms",
            Dpt7::TimePeriod100Ms => "ms",
            Dpt7::TimePeriodSec => "s",
            Dpt7::TimePeriodMin => "min",
            Dpt7::TimePeriodHr => "h",
            Dpt7::PropDataType => "",
            Dpt7::LengthMm => "mm",
            Dpt7::CurrentMa => "mA",
            Dpt7::Brightness => "lux",
            Dpt7::ColorTemperature => "K",
        }
    }

    /// Get the valid range for this DPT (min, max)
    #[inline]
    pub const fn range(&self) -> (u16, u16) {
        // All DPT 7.xxx types use full u16 range
        (0, 65535)
    }

    /// Decode 2 bytes (big-endian) to u16 value
    ///
    /// # Performance
    /// - Uses optimized big-endian conversion
    /// - Inlined for zero-cost abstraction
    /// - Bounds check happens once at start
    ///
    /// # Safety
    /// Uses `get_unchecked` after bounds validation for optimal performance.
    /// This is safe because we verify the slice length first.
    ///
    /// # Arguments
    /// * `data` - 2-byte slice in big-endian format
    ///
    /// # Returns
    /// The decoded u16 value (0-65535)
    ///
    /// # Errors
    /// Returns `InvalidDptData` if data length is not exactly 2 bytes
    #[inline]
    fn decode_raw(&self, data: &[u8]) -> Result<u16> {
        if data.len() < 2 {
            return Err(KnxError::invalid_dpt_data());
        }

        // SAFETY: Bounds checked above - data.len() >= 2 is guaranteed.
        // Indices 0 and 1 are both < 2, therefore within bounds.
        // Using get_unchecked eliminates redundant bounds checks in DPT decoding,
        // providing performance benefit for frequent value conversions in KNX communication.
        let bytes = unsafe { [*data.get_unchecked(0), *data.get_unchecked(1)] };

        // u16::from_be_bytes is optimized by LLVM to a simple load on big-endian
        // and a bswap instruction on little-endian (single cycle on ARM)
        Ok(u16::from_be_bytes(bytes))
    }
}

impl DptEncode<u16> for Dpt7 {
    fn encode(&self, value: u16, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }

        let bytes = value.to_be_bytes();
        buf[0] = bytes[0];
        buf[1] = bytes[1];
        Ok(2)
    }
}

impl DptDecode<u16> for Dpt7 {
    #[inline]
    fn decode(&self, data: &[u8]) -> Result<u16> {
        self.decode_raw(data)
    }
}
