//! Tag-keyed DPT metadata registry.
//!
//! Every DPT family module (`dpt1`, `dpt5`, `dpt9`, ...) already knows how to
//! encode and decode its own values; this module answers the orthogonal
//! question "does tag `5.001` exist, how long is its wire payload, and is it
//! short enough to live inside the APCI byte?" without requiring the caller
//! to already know which family a numeric tag belongs to.
//!
//! Per the KNX convention, a DPT tag is `major * 1000 + minor` (`5.001` is
//! `5001`, the bare major `9` is `9`). A lookup for an unregistered minor
//! falls back to its major's default entry; if neither is registered the
//! lookup fails with [`KnxError::dpt_not_found`].

use crate::error::{KnxError, Result};

/// A numeric DPT tag (`major * 1000 + minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DptTag(pub u32);

impl DptTag {
    /// Build a tag from its major/minor parts (e.g. `DptTag::new(9, 1)` is `9.001`).
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self(major * 1000 + minor)
    }

    /// The major component (e.g. `9` for `9.001`).
    #[must_use]
    pub const fn major(self) -> u32 {
        self.0 / 1000
    }

    /// The minor component (e.g. `1` for `9.001`).
    #[must_use]
    pub const fn minor(self) -> u32 {
        self.0 % 1000
    }

    /// The bare-major tag this one falls back to (e.g. `9.001` -> `9`).
    #[must_use]
    pub const fn major_tag(self) -> Self {
        Self(self.major() * 1000)
    }
}

impl From<u32> for DptTag {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One registry row: wire byte length (ignored when `is_short`), and
/// whether the value is short enough to be packed into the APCI byte
/// instead of carried as trailing application data (DPT 1/2/3 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    tag: u32,
    len: usize,
    is_short: bool,
}

const ENTRIES: &[Entry] = &[
    Entry { tag: 1000, len: 1, is_short: true },
    Entry { tag: 2000, len: 1, is_short: true },
    Entry { tag: 3000, len: 1, is_short: true },
    Entry { tag: 5000, len: 1, is_short: false },
    Entry { tag: 6000, len: 1, is_short: false },
    Entry { tag: 7000, len: 2, is_short: false },
    Entry { tag: 8000, len: 2, is_short: false },
    Entry { tag: 9000, len: 2, is_short: false },
    Entry { tag: 10001, len: 3, is_short: false },
    Entry { tag: 11001, len: 3, is_short: false },
    Entry { tag: 12000, len: 4, is_short: false },
    Entry { tag: 13000, len: 4, is_short: false },
    Entry { tag: 14000, len: 4, is_short: false },
    Entry { tag: 16000, len: 14, is_short: false },
    Entry { tag: 16001, len: 14, is_short: false },
    Entry { tag: 20000, len: 1, is_short: false },
    Entry { tag: 27001, len: 4, is_short: false },
    Entry { tag: 28001, len: 0, is_short: false }, // variable length
    Entry { tag: 29000, len: 8, is_short: false },
    Entry { tag: 232600, len: 3, is_short: false },
    Entry { tag: 238600, len: 1, is_short: false },
    Entry { tag: 245600, len: 4, is_short: false },
    Entry { tag: 250600, len: 4, is_short: false },
    Entry { tag: 251600, len: 6, is_short: false },
];

fn lookup(tag: DptTag) -> Option<Entry> {
    ENTRIES
        .iter()
        .find(|e| e.tag == tag.0)
        .or_else(|| ENTRIES.iter().find(|e| e.tag == tag.major_tag().0))
        .copied()
}

/// Wire byte length for `tag` (falling back to the major tag), or
/// [`KnxError::dpt_not_found`] if neither the exact tag nor its major are
/// registered. A return of `0` means variable-length (e.g. DPT 28).
pub fn dpt_byte_length(tag: DptTag) -> Result<usize> {
    lookup(tag).map(|e| e.len).ok_or_else(|| KnxError::dpt_not_found(tag.0))
}

/// Whether `tag`'s payload is short enough to be packed into the APCI byte
/// instead of appended as application data.
pub fn dpt_is_short(tag: DptTag) -> Result<bool> {
    lookup(tag).map(|e| e.is_short).ok_or_else(|| KnxError::dpt_not_found(tag.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_major_minor() {
        let tag = DptTag::new(9, 1);
        assert_eq!(tag.0, 9001);
        assert_eq!(tag.major(), 9);
        assert_eq!(tag.minor(), 1);
    }

    #[test]
    fn test_exact_tag_lookup() {
        assert_eq!(dpt_byte_length(DptTag(5001)).unwrap(), 1);
        assert!(dpt_is_short(DptTag(1001)).unwrap());
        assert!(!dpt_is_short(DptTag(5001)).unwrap());
    }

    #[test]
    fn test_unregistered_minor_falls_back_to_major() {
        // 5.123 is not registered, but bare "5" is.
        assert_eq!(dpt_byte_length(DptTag(5123)).unwrap(), 1);
    }

    #[test]
    fn test_unknown_tag_fails() {
        let result = dpt_byte_length(DptTag(9999999));
        assert!(result.is_err());
        match result.unwrap_err() {
            KnxError::Dpt(e) => assert_eq!(e.not_found_tag(), Some(9_999_999)),
            other => panic!("expected Dpt error, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_major_tag_itself() {
        assert_eq!(dpt_byte_length(DptTag(9)).unwrap(), 2);
    }
}
