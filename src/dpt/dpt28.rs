//! DPT 28.001 - UTF-8 Character String (variable length, NUL terminated)
//!
//! Unlike DPT 16, the wire length is not fixed: the encoded payload is the
//! UTF-8 bytes followed by a single NUL terminator, and nothing more.

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// Maximum string content this codec will encode or decode, excluding the
/// NUL terminator. Chosen generously for group-communication payloads; KNX
/// itself imposes no hard cap here.
pub const DPT28_MAX_LEN: usize = 63;

/// DPT 28.xxx UTF-8 string types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt28 {
    /// DPT 28.001 - UTF-8 string
    Utf8,
}

impl Dpt28 {
    /// Resolve a minor tag number (e.g. `1` for `28.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt28::Utf8),
            _ => None,
        }
    }
}

impl<'a> DptEncode<&'a str> for Dpt28 {
    fn encode(&self, value: &'a str, buf: &mut [u8]) -> Result<usize> {
        let bytes = value.as_bytes();
        if bytes.len() > DPT28_MAX_LEN {
            return Err(KnxError::dpt_value_out_of_range());
        }
        if buf.len() < bytes.len() + 1 {
            return Err(KnxError::buffer_too_small());
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        buf[bytes.len()] = 0;
        Ok(bytes.len() + 1)
    }
}

impl DptDecode<heapless::String<DPT28_MAX_LEN>> for Dpt28 {
    fn decode(&self, data: &[u8]) -> Result<heapless::String<DPT28_MAX_LEN>> {
        let nul_pos = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        let text = &data[..nul_pos];
        if text.len() > DPT28_MAX_LEN {
            return Err(KnxError::dpt_value_out_of_range());
        }
        let s = core::str::from_utf8(text).map_err(|_| KnxError::invalid_dpt_data())?;
        heapless::String::try_from(s).map_err(|()| KnxError::invalid_dpt_data())
    }
}
