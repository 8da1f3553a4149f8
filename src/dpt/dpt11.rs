//! DPT 11.001 - Date (3 bytes)
//!
//! ## Format
//!
//! ```text
//! Byte 0: 000D DDDD   day (1-31)
//! Byte 1: 0000 MMMM   month (1-12)
//! Byte 2: 0YYY YYYY   year modulo 100; 1990-1999 -> 90-99, 2000-2089 -> 00-89
//! ```
//!
//! Year range is 1990-2089: values 90-99 mean 1990-1999, values 00-89 mean
//! 2000-2089.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt11, DptEncode, DptDecode, KnxDate};
//!
//! let mut buf = [0u8; 3];
//! let d = KnxDate { day: 31, month: 12, year: 1999 };
//! let n = Dpt11::Date.encode(d, &mut buf)?;
//! assert_eq!(&buf[..n], &[0x9F, 0x0C, 0x63]);
//! # Ok::<(), knx_pico::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 11.xxx date types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt11 {
    /// DPT 11.001 - Date
    Date,
}

impl Dpt11 {
    /// Resolve a minor tag number (e.g. `1` for `11.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt11::Date),
            _ => None,
        }
    }
}

/// A KNX calendar date (DPT 11.001).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnxDate {
    /// Day of month, 1-31.
    pub day: u8,
    /// Month, 1-12.
    pub month: u8,
    /// Full year, 1990-2089.
    pub year: u16,
}

impl DptEncode<KnxDate> for Dpt11 {
    fn encode(&self, value: KnxDate, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }
        if !(1..=31).contains(&value.day)
            || !(1..=12).contains(&value.month)
            || !(1990..=2089).contains(&value.year)
        {
            return Err(KnxError::dpt_value_out_of_range());
        }
        let year_byte = if value.year >= 2000 {
            (value.year - 2000) as u8
        } else {
            (value.year - 1900) as u8
        };
        buf[0] = value.day & 0x1F;
        buf[1] = value.month & 0x0F;
        buf[2] = year_byte & 0x7F;
        Ok(3)
    }
}

impl DptDecode<KnxDate> for Dpt11 {
    fn decode(&self, data: &[u8]) -> Result<KnxDate> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }
        let day = data[0] & 0x1F;
        let month = data[1] & 0x0F;
        let year_byte = data[2] & 0x7F;
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return Err(KnxError::invalid_dpt_data());
        }
        let year = if year_byte >= 90 {
            1900 + u16::from(year_byte)
        } else {
            2000 + u16::from(year_byte)
        };
        Ok(KnxDate { day, month, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_1999_12_31_literal_vector() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 31, month: 12, year: 1999 };
        let n = Dpt11::Date.encode(d, &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(buf, [0x1F, 0x0C, 0x63]);
    }

    #[test]
    fn test_round_trip_y2k() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 1, month: 1, year: 2000 };
        Dpt11::Date.encode(d, &mut buf).unwrap();
        assert_eq!(Dpt11::Date.decode(&buf).unwrap(), d);
    }

    #[test]
    fn test_round_trip_far_future() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 15, month: 6, year: 2089 };
        Dpt11::Date.encode(d, &mut buf).unwrap();
        assert_eq!(Dpt11::Date.decode(&buf).unwrap(), d);
    }

    #[test]
    fn test_year_out_of_range_rejected() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 1, month: 1, year: 1989 };
        assert!(Dpt11::Date.encode(d, &mut buf).is_err());
    }

    #[test]
    fn test_invalid_month_decode_rejected() {
        assert!(Dpt11::Date.decode(&[1, 0, 0]).is_err());
    }
}
