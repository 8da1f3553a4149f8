//! DPT 16.xxx - 14-octet Character String (14 bytes, fixed length)
//!
//! ## Format
//!
//! 14 octets, NUL-padded after the string content. `16.000` restricts the
//! content to ASCII (bytes > 0x7F are rejected); `16.001` allows the full
//! ISO-8859-1 range.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt16, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 14];
//! let n = Dpt16::Ascii.encode("hello", &mut buf)?;
//! assert_eq!(n, 14);
//! let s = Dpt16::Ascii.decode(&buf[..n])?;
//! assert_eq!(s.as_str(), "hello");
//! # Ok::<(), knx_pico::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// Fixed wire length of a DPT 16 string.
pub const DPT16_LEN: usize = 14;

/// DPT 16.xxx fixed-length string types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt16 {
    /// DPT 16.000 - ASCII string (bytes > 0x7F rejected)
    Ascii,
    /// DPT 16.001 - ISO-8859-1 string (full byte range)
    Latin1,
}

impl Dpt16 {
    /// Get the DPT identifier string (e.g., "16.000")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt16::Ascii => "16.000",
            Dpt16::Latin1 => "16.001",
        }
    }

    /// Resolve a minor tag number (e.g. `0` for `16.000`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            0 => Some(Dpt16::Ascii),
            1 => Some(Dpt16::Latin1),
            _ => None,
        }
    }
}

impl<'a> DptEncode<&'a str> for Dpt16 {
    fn encode(&self, value: &'a str, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < DPT16_LEN {
            return Err(KnxError::buffer_too_small());
        }
        let bytes = value.as_bytes();
        if bytes.len() > DPT16_LEN {
            return Err(KnxError::dpt_value_out_of_range());
        }
        if matches!(self, Dpt16::Ascii) && bytes.iter().any(|&b| b > 0x7F) {
            return Err(KnxError::dpt_value_out_of_range());
        }
        buf[..DPT16_LEN].fill(0);
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(DPT16_LEN)
    }
}

impl DptDecode<heapless::String<DPT16_LEN>> for Dpt16 {
    fn decode(&self, data: &[u8]) -> Result<heapless::String<DPT16_LEN>> {
        if data.len() < DPT16_LEN {
            return Err(KnxError::invalid_dpt_data());
        }
        let content = &data[..DPT16_LEN];
        let nul_pos = content.iter().position(|&b| b == 0).unwrap_or(DPT16_LEN);
        let text = &content[..nul_pos];

        if matches!(self, Dpt16::Ascii) && text.iter().any(|&b| b > 0x7F) {
            return Err(KnxError::invalid_dpt_data());
        }

        let mut out = heapless::String::new();
        for &b in text {
            // ISO-8859-1 byte values map 1:1 onto the first 256 Unicode
            // code points, so this can never fail for in-range input.
            out.push(b as char).map_err(|()| KnxError::invalid_dpt_data())?;
        }
        Ok(out)
    }
}
