//! Face bitfields used by texture-entry delta sections.
//!
//! A face bitfield is a mask of face indices (bit `i` = face `i`) written as
//! groups of 7 bits, most significant group first. Every byte except the last
//! carries the continuation flag `0x80`. A single `0x00` byte is the
//! terminator of a delta section.

use crate::error::{ByteError, ByteResult};
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

/// Maximum number of bytes a 32-face bitfield can occupy.
pub const MAX_BITFIELD_BYTES: usize = 5;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// Reads a face bitfield.
///
/// Returns `Ok(0)` for the terminator byte and when the reader is already
/// exhausted, so truncated trailing sections read as "no overrides". A
/// bitfield cut off mid-way returns the groups seen so far.
pub fn read_face_bitfield(reader: &mut ByteReader<'_>) -> ByteResult<u32> {
    let mut bits = 0u64;
    let mut consumed = 0usize;
    while let Some(byte) = reader.peek_u8() {
        reader.skip(1)?;
        consumed += 1;
        bits = (bits << 7) | u64::from(byte & GROUP_MASK);
        if byte & CONTINUATION == 0 {
            break;
        }
        if consumed == MAX_BITFIELD_BYTES {
            return Err(ByteError::BitfieldOverflow { bytes: consumed });
        }
    }
    u32::try_from(bits).map_err(|_| ByteError::BitfieldOverflow { bytes: consumed })
}

/// Writes a face bitfield. A zero mask writes the single terminator byte.
pub fn write_face_bitfield(writer: &mut ByteWriter, bits: u32) {
    let len = face_bitfield_len(bits);
    if bits == 0 {
        writer.write_u8(0);
        return;
    }
    for i in 0..len {
        let shift = 7 * (len - i - 1);
        let mut byte = ((bits >> shift) as u8) & GROUP_MASK;
        if i + 1 < len {
            byte |= CONTINUATION;
        }
        writer.write_u8(byte);
    }
}

/// Returns the encoded length of a face bitfield in bytes.
#[must_use]
pub const fn face_bitfield_len(bits: u32) -> usize {
    if bits == 0 {
        return 1;
    }
    let significant = 32 - bits.leading_zeros() as usize;
    significant.div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(bits: u32) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        write_face_bitfield(&mut writer, bits);
        writer.finish()
    }

    #[test]
    fn terminator_is_single_zero_byte() {
        assert_eq!(encode(0), vec![0x00]);
        let mut reader = ByteReader::new(&[0x00, 0xAA]);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0);
        // only the terminator is consumed
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn single_group() {
        assert_eq!(encode(0b0010_0100), vec![0b0010_0100]);
    }

    #[test]
    fn msb_group_first() {
        // face 7 needs a second group
        let bytes = encode(1 << 7);
        assert_eq!(bytes, vec![0x81, 0x00]);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 1 << 7);
    }

    #[test]
    fn highest_face_uses_five_bytes() {
        let bytes = encode(1 << 31);
        assert_eq!(bytes.len(), MAX_BITFIELD_BYTES);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 1 << 31);
    }

    #[test]
    fn exhausted_reader_reads_as_terminator() {
        let mut reader = ByteReader::new(&[]);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0);
    }

    #[test]
    fn runaway_continuation_is_rejected() {
        let mut reader = ByteReader::new(&[0xFF; 8]);
        let err = read_face_bitfield(&mut reader).unwrap_err();
        assert!(matches!(err, ByteError::BitfieldOverflow { .. }));
    }

    #[test]
    fn len_matches_encoding() {
        for bits in [0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, u32::MAX] {
            assert_eq!(face_bitfield_len(bits), encode(bits).len(), "bits {bits:#x}");
        }
    }
}
