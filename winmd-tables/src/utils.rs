//! Little-endian primitives over byte slices.
//!
//! The tables stream is little-endian throughout and makes no alignment
//! promises, so all multi-byte reads go through these bounds-checked helpers.

/// Reads a little-endian `u32` at the given offset, if in bounds.
pub(crate) fn u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..)?.get(..4)?;
    Some(u32::from_le_bytes(bytes.try_into().unwrap()))
}

/// Reads a little-endian `u64` at the given offset, if in bounds.
pub(crate) fn u64_at(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..)?.get(..8)?;
    Some(u64::from_le_bytes(bytes.try_into().unwrap()))
}

/// Accumulates up to eight little-endian bytes into a `u64`.
pub(crate) fn read_le(bytes: &[u8]) -> u64 {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().enumerate() {
        value |= (*byte as u64) << (8 * i);
    }
    value
}
