//! Tag-generic typed dispatch over the DPT codec registry.
//!
//! Every per-family module (`dpt1`, `dpt5`, `dpt9`, ...) already knows how
//! to encode/decode its own typed value; `pack`/`unpack` here are the layer
//! the public `write(group_address, dpt_tag, value)` API needs on top of
//! that — given a numeric [`DptTag`] and a [`DptValue`], pick the family
//! module the tag belongs to and call into it, without the caller needing
//! to know ahead of time which family backs a given tag number.
//!
//! An unregistered minor falls back to that family's most common member
//! (e.g. an unknown `9.1xx` falls back to `Dpt9::Temperature`'s encoding,
//! which is shape-identical to every other `Dpt9` variant — only the unit
//! label differs), mirroring [`crate::dpt::registry`]'s major-tag fallback.

use crate::dpt::dpt10::TimeOfDay;
use crate::dpt::dpt11::KnxDate;
use crate::dpt::dpt20::EnumValue;
use crate::dpt::dpt238::DaliStatus;
use crate::dpt::dpt245::DaliConverterTestResult;
use crate::dpt::dpt250::BrightnessColourTempControl;
use crate::dpt::dpt27::CombinedOnOff;
use crate::dpt::dpt232::Rgb;
use crate::dpt::dpt251::Rgbw;
use crate::dpt::dpt3::{ControlCommand, StepCode};
use crate::dpt::dpt6::StatusMode;
use crate::dpt::registry::DptTag;
use crate::dpt::{
    Dpt1, Dpt2, Dpt3, Dpt5, Dpt6, Dpt7, Dpt8, Dpt9, Dpt10, Dpt11, Dpt12, Dpt13, Dpt14, Dpt16,
    Dpt20, Dpt232, Dpt238, Dpt245, Dpt250, Dpt251, Dpt27, Dpt28, Dpt29, DptDecode, DptEncode,
};
use crate::error::{KnxError, Result};

/// Maximum text length carried inline in a [`DptValue::TextUtf8`], matching
/// [`crate::dpt::dpt28::DPT28_MAX_LEN`].
const TEXT_UTF8_CAP: usize = crate::dpt::dpt28::DPT28_MAX_LEN;

/// A typed value tagged by which DPT family produced or will consume it.
///
/// This is the shape [`pack`]/[`unpack`] speak so a caller only needs a
/// numeric [`DptTag`] to encode or decode a value, without importing the
/// specific per-family module.
#[derive(Debug, Clone, PartialEq)]
pub enum DptValue {
    /// DPT 1.xxx - a single bit.
    Bool(bool),
    /// DPT 2.xxx - `(control, value)`.
    Control(bool, bool),
    /// DPT 3.xxx - `(increase, step)`.
    Step(bool, StepCode),
    /// DPT 5.xxx / 7.xxx - an unsigned 16-bit physical value.
    U16(u16),
    /// DPT 6.001 / 6.010 - a signed 8-bit physical value.
    I8(i8),
    /// DPT 6.020 - status bits + active mode.
    StatusMode(StatusMode),
    /// DPT 8.xxx - a signed 16-bit physical value.
    I16(i16),
    /// DPT 9.xxx / 14.xxx - a floating point physical value.
    F32(f32),
    /// DPT 10.001 - time of day.
    TimeOfDay(TimeOfDay),
    /// DPT 11.001 - calendar date.
    Date(KnxDate),
    /// DPT 12.xxx - an unsigned 32-bit counter.
    U32(u32),
    /// DPT 13.xxx - a signed 32-bit counter.
    I32(i32),
    /// DPT 16.xxx - a fixed 14-octet string.
    Text14(heapless::String<14>),
    /// DPT 28.001 - a variable-length UTF-8 string.
    TextUtf8(heapless::String<TEXT_UTF8_CAP>),
    /// DPT 20.xxx - an 8-bit enumeration.
    Enum8(u8),
    /// DPT 27.001 - 16-channel combined on/off.
    CombinedOnOff(CombinedOnOff),
    /// DPT 29.xxx - a signed 64-bit counter.
    I64(i64),
    /// DPT 232.600 - RGB colour.
    Rgb(Rgb),
    /// DPT 238.600 - DALI diagnostics.
    DaliStatus(DaliStatus),
    /// DPT 245.600 - DALI converter test result.
    DaliConverterTestResult(DaliConverterTestResult),
    /// DPT 250.600 - brightness / colour temperature control.
    BrightnessColourTempControl(BrightnessColourTempControl),
    /// DPT 251.600 - RGBW colour with per-channel validity.
    Rgbw(Rgbw),
}

/// Encode `value` for `tag` into `buf`, returning the number of bytes
/// written. Fails with [`KnxError::dpt_not_found`] if `tag`'s major isn't
/// registered, or [`KnxError::invalid_dpt_payload`] if `value`'s shape
/// doesn't match the one `tag`'s family expects.
pub fn pack(tag: DptTag, value: &DptValue, buf: &mut [u8]) -> Result<usize> {
    let minor = tag.minor();
    match tag.major() {
        1 => {
            let DptValue::Bool(b) = value else { return Err(shape_mismatch()) };
            Dpt1::from_tag(minor).unwrap_or(Dpt1::Switch).encode(*b, buf)
        }
        2 => {
            let DptValue::Control(c, v) = value else { return Err(shape_mismatch()) };
            Dpt2::from_tag(minor).unwrap_or(Dpt2::Switch).encode((*c, *v), buf)
        }
        3 => {
            let DptValue::Step(inc, step) = value else { return Err(shape_mismatch()) };
            Dpt3::from_tag(minor).unwrap_or(Dpt3::Dimming).encode((*inc, *step), buf)
        }
        5 => {
            let DptValue::U16(v) = value else { return Err(shape_mismatch()) };
            Dpt5::from_tag(minor).unwrap_or(Dpt5::Percentage).encode(*v, buf)
        }
        6 => match Dpt6::from_tag(minor).unwrap_or(Dpt6::Percentage) {
            Dpt6::Status => {
                let DptValue::StatusMode(sm) = value else { return Err(shape_mismatch()) };
                Dpt6::Status.encode(*sm, buf)
            }
            other => {
                let DptValue::I8(v) = value else { return Err(shape_mismatch()) };
                other.encode(*v, buf)
            }
        },
        7 => {
            let DptValue::U16(v) = value else { return Err(shape_mismatch()) };
            Dpt7::from_tag(minor).unwrap_or(Dpt7::Pulses).encode(*v, buf)
        }
        8 => {
            let DptValue::I16(v) = value else { return Err(shape_mismatch()) };
            Dpt8::from_tag(minor).unwrap_or(Dpt8::PulsesDifference).encode(*v, buf)
        }
        9 => {
            let DptValue::F32(v) = value else { return Err(shape_mismatch()) };
            Dpt9::from_tag(minor).unwrap_or(Dpt9::Temperature).encode(*v, buf)
        }
        10 => {
            let DptValue::TimeOfDay(v) = value else { return Err(shape_mismatch()) };
            Dpt10::TimeOfDay.encode(*v, buf)
        }
        11 => {
            let DptValue::Date(v) = value else { return Err(shape_mismatch()) };
            Dpt11::Date.encode(*v, buf)
        }
        12 => {
            let DptValue::U32(v) = value else { return Err(shape_mismatch()) };
            Dpt12::Counter.encode(*v, buf)
        }
        13 => {
            let DptValue::I32(v) = value else { return Err(shape_mismatch()) };
            Dpt13::from_tag(minor).unwrap_or(Dpt13::Counter).encode(*v, buf)
        }
        14 => {
            let DptValue::F32(v) = value else { return Err(shape_mismatch()) };
            Dpt14::from_tag(minor).unwrap_or(Dpt14::Acceleration).encode(*v, buf)
        }
        16 => {
            let DptValue::Text14(s) = value else { return Err(shape_mismatch()) };
            Dpt16::from_tag(minor).unwrap_or(Dpt16::Latin1).encode(s.as_str(), buf)
        }
        20 => {
            let DptValue::Enum8(v) = value else { return Err(shape_mismatch()) };
            Dpt20::from_tag(minor).unwrap_or(Dpt20::ScloMode).encode(*v, buf)
        }
        27 => {
            let DptValue::CombinedOnOff(v) = value else { return Err(shape_mismatch()) };
            Dpt27::CombinedInfoOnOff.encode(*v, buf)
        }
        28 => {
            let DptValue::TextUtf8(s) = value else { return Err(shape_mismatch()) };
            Dpt28::Utf8.encode(s.as_str(), buf)
        }
        29 => {
            let DptValue::I64(v) = value else { return Err(shape_mismatch()) };
            Dpt29::from_tag(minor).unwrap_or(Dpt29::ActiveEnergy).encode(*v, buf)
        }
        232 => {
            let DptValue::Rgb(v) = value else { return Err(shape_mismatch()) };
            Dpt232::Rgb.encode(*v, buf)
        }
        238 => {
            let DptValue::DaliStatus(v) = value else { return Err(shape_mismatch()) };
            Dpt238::DaliStatus.encode(*v, buf)
        }
        245 => {
            let DptValue::DaliConverterTestResult(v) = value else { return Err(shape_mismatch()) };
            Dpt245::ConverterTestResult.encode(*v, buf)
        }
        250 => {
            let DptValue::BrightnessColourTempControl(v) = value else {
                return Err(shape_mismatch());
            };
            Dpt250::BrightnessColourTemperatureControl.encode(*v, buf)
        }
        251 => {
            let DptValue::Rgbw(v) = value else { return Err(shape_mismatch()) };
            Dpt251::Rgbw.encode(*v, buf)
        }
        _ => Err(KnxError::dpt_not_found(tag.0)),
    }
}

/// Decode `data` for `tag` into a [`DptValue`]. Fails with
/// [`KnxError::dpt_not_found`] if `tag`'s major isn't registered, or the
/// underlying family's own decode error (truncated/out-of-range data).
pub fn unpack(tag: DptTag, data: &[u8]) -> Result<DptValue> {
    let minor = tag.minor();
    match tag.major() {
        1 => Ok(DptValue::Bool(Dpt1::from_tag(minor).unwrap_or(Dpt1::Switch).decode(data)?)),
        2 => {
            let (c, v) = Dpt2::from_tag(minor).unwrap_or(Dpt2::Switch).decode(data)?;
            Ok(DptValue::Control(c, v))
        }
        3 => {
            let ControlCommand { control, stepcode } =
                Dpt3::from_tag(minor).unwrap_or(Dpt3::Dimming).decode(data)?;
            Ok(DptValue::Step(control, stepcode))
        }
        5 => Ok(DptValue::U16(Dpt5::from_tag(minor).unwrap_or(Dpt5::Percentage).decode(data)?)),
        6 => match Dpt6::from_tag(minor).unwrap_or(Dpt6::Percentage) {
            Dpt6::Status => Ok(DptValue::StatusMode(Dpt6::Status.decode(data)?)),
            other => Ok(DptValue::I8(DptDecode::<i8>::decode(&other, data)?)),
        },
        7 => Ok(DptValue::U16(Dpt7::from_tag(minor).unwrap_or(Dpt7::Pulses).decode(data)?)),
        8 => Ok(DptValue::I16(
            Dpt8::from_tag(minor).unwrap_or(Dpt8::PulsesDifference).decode(data)?,
        )),
        9 => Ok(DptValue::F32(Dpt9::from_tag(minor).unwrap_or(Dpt9::Temperature).decode(data)?)),
        10 => Ok(DptValue::TimeOfDay(Dpt10::TimeOfDay.decode(data)?)),
        11 => Ok(DptValue::Date(Dpt11::Date.decode(data)?)),
        12 => Ok(DptValue::U32(Dpt12::Counter.decode(data)?)),
        13 => Ok(DptValue::I32(Dpt13::from_tag(minor).unwrap_or(Dpt13::Counter).decode(data)?)),
        14 => Ok(DptValue::F32(
            Dpt14::from_tag(minor).unwrap_or(Dpt14::Acceleration).decode(data)?,
        )),
        16 => {
            let s = Dpt16::from_tag(minor).unwrap_or(Dpt16::Latin1).decode(data)?;
            Ok(DptValue::Text14(s))
        }
        20 => {
            let EnumValue { raw, .. } =
                Dpt20::from_tag(minor).unwrap_or(Dpt20::ScloMode).decode(data)?;
            Ok(DptValue::Enum8(raw))
        }
        27 => Ok(DptValue::CombinedOnOff(Dpt27::CombinedInfoOnOff.decode(data)?)),
        28 => Ok(DptValue::TextUtf8(Dpt28::Utf8.decode(data)?)),
        29 => Ok(DptValue::I64(Dpt29::from_tag(minor).unwrap_or(Dpt29::ActiveEnergy).decode(data)?)),
        232 => Ok(DptValue::Rgb(Dpt232::Rgb.decode(data)?)),
        238 => Ok(DptValue::DaliStatus(Dpt238::DaliStatus.decode(data)?)),
        245 => Ok(DptValue::DaliConverterTestResult(Dpt245::ConverterTestResult.decode(data)?)),
        250 => Ok(DptValue::BrightnessColourTempControl(
            Dpt250::BrightnessColourTemperatureControl.decode(data)?,
        )),
        251 => Ok(DptValue::Rgbw(Dpt251::Rgbw.decode(data)?)),
        _ => Err(KnxError::dpt_not_found(tag.0)),
    }
}

fn shape_mismatch() -> KnxError {
    KnxError::unsupported_dpt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_bool() {
        let tag = DptTag::new(1, 1);
        let mut buf = [0u8; 1];
        let n = pack(tag, &DptValue::Bool(true), &mut buf).unwrap();
        assert_eq!(unpack(tag, &buf[..n]).unwrap(), DptValue::Bool(true));
    }

    #[test]
    fn round_trip_percentage() {
        let tag = DptTag::new(5, 1);
        let mut buf = [0u8; 1];
        let n = pack(tag, &DptValue::U16(50), &mut buf).unwrap();
        assert_eq!(buf[..n], [0x80]);
        let DptValue::U16(v) = unpack(tag, &buf[..n]).unwrap() else { panic!("wrong shape") };
        assert!((49..=50).contains(&v));
    }

    #[test]
    fn round_trip_temperature() {
        let tag = DptTag::new(9, 1);
        let mut buf = [0u8; 2];
        let n = pack(tag, &DptValue::F32(-1.0), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x87, 0x9C]);
        assert_eq!(unpack(tag, &buf[..n]).unwrap(), DptValue::F32(-1.0));
    }

    #[test]
    fn round_trip_dali_status() {
        let tag = DptTag::new(238, 600);
        let value = DaliStatus { lamp_on: true, ..Default::default() };
        let mut buf = [0u8; 1];
        let n = pack(tag, &DptValue::DaliStatus(value), &mut buf).unwrap();
        assert_eq!(unpack(tag, &buf[..n]).unwrap(), DptValue::DaliStatus(value));
    }

    #[test]
    fn unknown_major_fails() {
        let tag = DptTag::new(9999, 0);
        assert!(unpack(tag, &[0, 0]).is_err());
    }

    #[test]
    fn shape_mismatch_rejected() {
        let tag = DptTag::new(1, 1);
        let mut buf = [0u8; 2];
        assert!(pack(tag, &DptValue::U16(1), &mut buf).is_err());
    }
}
