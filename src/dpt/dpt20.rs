//! DPT 20.xxx - 8-bit Enumeration (1 byte)
//!
//! Each DPT 20 subtype defines its own closed set of valid byte values with
//! a human-readable label. A byte outside that subtype's defined range still
//! decodes successfully — as `"reserved"` — so a gateway that forwards
//! manufacturer-specific or future values round-trips them unharmed.
//!
//! ## Common Subtypes
//!
//! - **20.001** - `SCLOMode`: 0=Autonomous, 1=Slave, 2=Master
//! - **20.102** - `HvacMode`: 0=Auto, 1=Comfort, 2=Standby, 3=Economy, 4=BuildingProtection

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 20.xxx 8-bit enumeration types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt20 {
    /// DPT 20.001 - `SCLOMode`
    ScloMode,
    /// DPT 20.102 - `HvacMode`
    HvacMode,
}

/// A decoded DPT 20 value: the raw byte plus its label (`"reserved"` if the
/// byte falls outside the subtype's defined enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Raw byte exactly as received, preserved even when out of range.
    pub raw: u8,
    /// Human-readable label, or `"reserved"`.
    pub label: &'static str,
}

const SCLO_MODE: &[(u8, &str)] = &[(0, "autonomous"), (1, "slave"), (2, "master")];

const HVAC_MODE: &[(u8, &str)] = &[
    (0, "auto"),
    (1, "comfort"),
    (2, "standby"),
    (3, "economy"),
    (4, "building-protection"),
];

impl Dpt20 {
    /// Get the DPT identifier string (e.g., "20.102")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt20::ScloMode => "20.001",
            Dpt20::HvacMode => "20.102",
        }
    }

    /// Resolve a minor tag number (e.g. `1` for `20.001`) back to its variant.
    pub const fn from_tag(minor: u32) -> Option<Self> {
        match minor {
            1 => Some(Dpt20::ScloMode),
            102 => Some(Dpt20::HvacMode),
            _ => None,
        }
    }

    fn table(&self) -> &'static [(u8, &'static str)] {
        match self {
            Dpt20::ScloMode => SCLO_MODE,
            Dpt20::HvacMode => HVAC_MODE,
        }
    }

    fn label_for(&self, raw: u8) -> &'static str {
        self.table()
            .iter()
            .find(|(v, _)| *v == raw)
            .map_or("reserved", |(_, label)| *label)
    }
}

impl DptEncode<u8> for Dpt20 {
    fn encode(&self, value: u8, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(KnxError::buffer_too_small());
        }
        if !self.table().iter().any(|(v, _)| *v == value) {
            return Err(KnxError::dpt_value_out_of_range());
        }
        buf[0] = value;
        Ok(1)
    }
}

impl DptDecode<EnumValue> for Dpt20 {
    fn decode(&self, data: &[u8]) -> Result<EnumValue> {
        if data.is_empty() {
            return Err(KnxError::invalid_dpt_data());
        }
        Ok(EnumValue { raw: data[0], label: self.label_for(data[0]) })
    }
}
