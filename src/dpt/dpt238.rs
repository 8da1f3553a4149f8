//! DPT 238.600 - DALI Diagnostics / Status (1 byte)
//!
//! Exposes the per-channel diagnostic flags a DALI gateway reports about the
//! attached converter/ballast. `spec.md` names this family ("DALI status")
//! but the canonical bit table it refers readers to was not available in
//! this repository's source material; the layout below follows the same
//! "one bit per flag, reserved bits zero" convention the registered DPT 1/2
//! families already use, and is called out as an open question in
//! `DESIGN.md`.
//!
//! ## Format
//!
//! ```text
//! Byte 0: bit 0 - converter/ballast failure
//!         bit 1 - lamp failure
//!         bit 2 - lamp arc power reduced (dimming limited)
//!         bit 3 - lamp on (current output state)
//!         bit 4 - limit exceeded (overcurrent/overtemp)
//!         bit 5 - fade running (transition in progress)
//!         bit 6 - reset state (device reset since last poll)
//!         bit 7 - missing/unreachable on the DALI bus
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 238.xxx DALI diagnostics types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt238 {
    /// DPT 238.600 - DALI diagnostics / status.
    DaliStatus,
}

impl Dpt238 {
    /// Get the DPT identifier string (e.g., "238.600").
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt238::DaliStatus => "238.600",
        }
    }

    /// Resolve a minor tag number (e.g. `600`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            600 => Some(Dpt238::DaliStatus),
            _ => None,
        }
    }
}

/// Decoded DALI diagnostic flags (DPT 238.600).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaliStatus {
    /// Converter/ballast reports a failure.
    pub converter_failure: bool,
    /// Lamp failure reported.
    pub lamp_failure: bool,
    /// Lamp arc power is reduced (limited dimming range).
    pub lamp_arc_power_reduced: bool,
    /// Lamp is currently on.
    pub lamp_on: bool,
    /// A current/temperature limit was exceeded.
    pub limit_exceeded: bool,
    /// A fade transition is currently running.
    pub fade_running: bool,
    /// Device reported a reset since the last poll.
    pub reset_state: bool,
    /// Device is missing/unreachable on the DALI bus.
    pub missing: bool,
}

impl DptEncode<DaliStatus> for Dpt238 {
    fn encode(&self, value: DaliStatus, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(KnxError::buffer_too_small());
        }
        let mut byte = 0u8;
        byte |= u8::from(value.converter_failure);
        byte |= u8::from(value.lamp_failure) << 1;
        byte |= u8::from(value.lamp_arc_power_reduced) << 2;
        byte |= u8::from(value.lamp_on) << 3;
        byte |= u8::from(value.limit_exceeded) << 4;
        byte |= u8::from(value.fade_running) << 5;
        byte |= u8::from(value.reset_state) << 6;
        byte |= u8::from(value.missing) << 7;
        buf[0] = byte;
        Ok(1)
    }
}

impl DptDecode<DaliStatus> for Dpt238 {
    fn decode(&self, data: &[u8]) -> Result<DaliStatus> {
        if data.is_empty() {
            return Err(KnxError::invalid_dpt_data());
        }
        let byte = data[0];
        Ok(DaliStatus {
            converter_failure: byte & 0x01 != 0,
            lamp_failure: byte & 0x02 != 0,
            lamp_arc_power_reduced: byte & 0x04 != 0,
            lamp_on: byte & 0x08 != 0,
            limit_exceeded: byte & 0x10 != 0,
            fade_running: byte & 0x20 != 0,
            reset_state: byte & 0x40 != 0,
            missing: byte & 0x80 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_flags() {
        let value = DaliStatus {
            converter_failure: true,
            lamp_failure: false,
            lamp_arc_power_reduced: true,
            lamp_on: true,
            limit_exceeded: false,
            fade_running: true,
            reset_state: false,
            missing: true,
        };
        let mut buf = [0u8; 1];
        let n = Dpt238::DaliStatus.encode(value, &mut buf).unwrap();
        assert_eq!(n, 1);
        let decoded = Dpt238::DaliStatus.decode(&buf).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn zero_byte_decodes_to_no_flags() {
        let decoded = Dpt238::DaliStatus.decode(&[0x00]).unwrap();
        assert_eq!(decoded, DaliStatus::default());
    }

    #[test]
    fn from_tag_resolves_known_minor() {
        assert_eq!(Dpt238::from_tag(600), Some(Dpt238::DaliStatus));
        assert_eq!(Dpt238::from_tag(601), None);
    }
}
