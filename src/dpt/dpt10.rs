//! DPT 10.001 - Time of Day (3 bytes)
//!
//! ## Format
//!
//! ```text
//! Byte 0: DDDH HHHH   day (0-7, 0 = "no day") / hour (0-23)
//! Byte 1: 00MM MMMM   minutes (0-59)
//! Byte 2: 00SS SSSS   seconds (0-59)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt10, DptEncode, DptDecode, TimeOfDay, Weekday};
//!
//! let mut buf = [0u8; 3];
//! let t = TimeOfDay { day: Weekday::Monday, hour: 12, minute: 30, second: 0 };
//! let n = Dpt10::TimeOfDay.encode(t, &mut buf)?;
//! let decoded = Dpt10::TimeOfDay.decode(&buf[..n])?;
//! assert_eq!(decoded, t);
//! # Ok::<(), knx_pico::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 10.xxx time types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt10 {
    /// DPT 10.001 - Time of day
    TimeOfDay,
}

impl Dpt10 {
    /// Resolve a minor tag number (e.g. `1` for `10.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt10::TimeOfDay),
            _ => None,
        }
    }
}

/// Day of week carried alongside a [`TimeOfDay`]; `NoDay` means "day field
/// not used" per the KNX specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Weekday {
    /// Field not used.
    NoDay = 0,
    /// Monday.
    Monday = 1,
    /// Tuesday.
    Tuesday = 2,
    /// Wednesday.
    Wednesday = 3,
    /// Thursday.
    Thursday = 4,
    /// Friday.
    Friday = 5,
    /// Saturday.
    Saturday = 6,
    /// Sunday.
    Sunday = 7,
}

impl Weekday {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            6 => Self::Saturday,
            7 => Self::Sunday,
            _ => Self::NoDay,
        }
    }
}

/// A KNX time-of-day value (DPT 10.001).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    /// Day of the week, or `NoDay`.
    pub day: Weekday,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl DptEncode<TimeOfDay> for Dpt10 {
    fn encode(&self, value: TimeOfDay, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }
        if value.hour > 23 || value.minute > 59 || value.second > 59 {
            return Err(KnxError::dpt_value_out_of_range());
        }
        buf[0] = ((value.day as u8) << 5) | value.hour;
        buf[1] = value.minute & 0x3F;
        buf[2] = value.second & 0x3F;
        Ok(3)
    }
}

impl DptDecode<TimeOfDay> for Dpt10 {
    fn decode(&self, data: &[u8]) -> Result<TimeOfDay> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }
        let day = Weekday::from_u8(data[0] >> 5);
        let hour = data[0] & 0x1F;
        let minute = data[1] & 0x3F;
        let second = data[2] & 0x3F;
        if hour > 23 || minute > 59 || second > 59 {
            return Err(KnxError::invalid_dpt_data());
        }
        Ok(TimeOfDay { day, hour, minute, second })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_noon() {
        let mut buf = [0u8; 3];
        let t = TimeOfDay { day: Weekday::Monday, hour: 12, minute: 30, second: 15 };
        let n = Dpt10::TimeOfDay.encode(t, &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(Dpt10::TimeOfDay.decode(&buf).unwrap(), t);
    }

    #[test]
    fn test_no_day() {
        let mut buf = [0u8; 3];
        let t = TimeOfDay { day: Weekday::NoDay, hour: 0, minute: 0, second: 0 };
        Dpt10::TimeOfDay.encode(t, &mut buf).unwrap();
        assert_eq!(buf[0], 0x00);
        assert_eq!(Dpt10::TimeOfDay.decode(&buf).unwrap().day, Weekday::NoDay);
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let mut buf = [0u8; 3];
        let t = TimeOfDay { day: Weekday::Sunday, hour: 24, minute: 0, second: 0 };
        assert!(Dpt10::TimeOfDay.encode(t, &mut buf).is_err());
    }

    #[test]
    fn test_decode_ignores_reserved_bits() {
        // high bits of the minute octet are reserved, must be masked out.
        let data = [0x00, 0xC0 | 30, 0x00];
        let decoded = Dpt10::TimeOfDay.decode(&data).unwrap();
        assert_eq!(decoded.minute, 30);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(Dpt10::TimeOfDay.decode(&[0x00, 0x00]).is_err());
    }
}
