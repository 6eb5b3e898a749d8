//! Low-level byte primitives for the gridsync protocol codecs.
//!
//! This crate provides [`ByteReader`] and [`ByteWriter`] for little-endian
//! wire data, the 7-bit face bitfield used by texture-entry delta sections,
//! and the float quantization helpers shared by every object-update layout.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about primitives or avatars.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{read_face_bitfield, write_face_bitfield, ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u32(7);
//! write_face_bitfield(&mut writer, 0b1000_0100);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u32().unwrap(), 7);
//! assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0b1000_0100);
//! ```

mod bitfield;
mod error;
pub mod quantize;
mod reader;
mod writer;

pub use bitfield::{face_bitfield_len, read_face_bitfield, write_face_bitfield, MAX_BITFIELD_BYTES};
pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let reader = ByteReader::new(&bytes);
        assert!(reader.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);
        writer.write_u16(0xBEEF);
        write_face_bitfield(&mut writer, 1 << 9);
        writer.write_f32(-2.5);
        writer.write_cstr(b"name");
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 1 << 9);
        assert_eq!(reader.read_f32().unwrap(), -2.5);
        assert_eq!(reader.read_cstr().unwrap(), b"name");
        assert!(reader.is_empty());
    }

    #[test]
    fn doctest_example() {
        let mut writer = ByteWriter::new();
        writer.write_u32(7);
        write_face_bitfield(&mut writer, 0b1000_0100);
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 7);
        assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0b1000_0100);
    }
}
