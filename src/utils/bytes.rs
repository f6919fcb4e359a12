//! Byte-slice helpers for reading payload fields.
//!
//! Payload integers are stored **big-endian** regardless of the byte order of the record
//! header that carries them, so these helpers never need to know how the record was decoded.
//!
//! There are two layers:
//! - **Option layer** (`read_*`): return `None` when the slice is too short.
//! - **Result layer** (`*_r`): map `None` to `FormatError::PayloadTooShort`.

use crate::err::FormatError;

/// Read `N` raw bytes at `offset`.
///
/// Returns `None` if the range is out of bounds.
pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    let bytes: [u8; N] = buf.get(offset..end)?.try_into().ok()?;
    Some(bytes)
}

/// Read a `u32` (big-endian) at `offset`.
pub(crate) fn read_u32_be(buf: &[u8], offset: usize) -> Option<u32> {
    Some(u32::from_be_bytes(read_array::<4>(buf, offset)?))
}

/// Read a `u64` (big-endian) at `offset`.
pub(crate) fn read_u64_be(buf: &[u8], offset: usize) -> Option<u64> {
    Some(u64::from_be_bytes(read_array::<8>(buf, offset)?))
}

#[inline]
fn too_short(what: &'static str, offset: usize, need: usize, len: usize) -> FormatError {
    FormatError::PayloadTooShort {
        what,
        need: offset.saturating_add(need),
        have: len,
    }
}

/// Read a `u32` (big-endian) at `offset`, or return `FormatError::PayloadTooShort`.
pub(crate) fn read_u32_be_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u32, FormatError> {
    read_u32_be(buf, offset).ok_or_else(|| too_short(what, offset, 4, buf.len()))
}

/// Read a `u64` (big-endian) at `offset`, or return `FormatError::PayloadTooShort`.
pub(crate) fn read_u64_be_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u64, FormatError> {
    read_u64_be(buf, offset).ok_or_else(|| too_short(what, offset, 8, buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let buf = [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2];
        assert_eq!(read_u32_be(&buf, 0), Some(1));
        assert_eq!(read_u64_be(&buf, 4), Some(2));
        assert_eq!(read_u64_be(&buf, 5), None);
    }

    #[test]
    fn test_short_read_reports_required_length() {
        let err = read_u64_be_r(&[1, 2, 3], 8, "remap sector").unwrap_err();
        match err {
            FormatError::PayloadTooShort { what, need, have } => {
                assert_eq!(what, "remap sector");
                assert_eq!(need, 16);
                assert_eq!(have, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
