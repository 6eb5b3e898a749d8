//! Little-endian byte cursor with bounded operations.

use crate::error::{ByteError, ByteResult};

/// A byte cursor for decoding packed little-endian wire data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unread tail of the buffer without advancing.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Peeks at the next byte without advancing.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Moves the cursor to an absolute position.
    pub fn seek(&mut self, position: usize) -> ByteResult<()> {
        if position > self.data.len() {
            return Err(ByteError::InvalidSeek {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Skips `count` bytes.
    pub fn skip(&mut self, count: usize) -> ByteResult<()> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// Reads an `i8`.
    pub fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_le_bytes(self.read_array::<1>()?))
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> ByteResult<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> ByteResult<f32> {
        Ok(f32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Reads `len` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Reads bytes up to (not including) a null terminator and consumes the terminator.
    pub fn read_cstr(&mut self) -> ByteResult<&'a [u8]> {
        let start = self.pos;
        let tail = self.rest();
        let Some(len) = tail.iter().position(|b| *b == 0) else {
            return Err(ByteError::UnterminatedString { start });
        };
        let out = &tail[..len];
        self.pos += len + 1;
        Ok(out)
    }

    fn ensure(&self, bytes: usize) -> ByteResult<()> {
        let available = self.remaining();
        if bytes > available {
            return Err(ByteError::UnexpectedEof {
                requested: bytes,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(result, Err(ByteError::UnexpectedEof { .. })));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_f32_roundtrip_bits() {
        let bytes = 1.5f32.to_le_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
    }

    #[test]
    fn read_signed() {
        let mut reader = ByteReader::new(&[0xFF, 0xFE, 0xFF]);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.read_i16().unwrap(), -2);
    }

    #[test]
    fn short_read_reports_available() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            ByteError::UnexpectedEof {
                requested: 4,
                available: 3
            }
        );
        // failed reads do not advance
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_cstr_consumes_terminator() {
        let mut reader = ByteReader::new(b"hello\0world\0");
        assert_eq!(reader.read_cstr().unwrap(), b"hello");
        assert_eq!(reader.read_cstr().unwrap(), b"world");
        assert!(reader.is_empty());
    }

    #[test]
    fn read_cstr_unterminated() {
        let mut reader = ByteReader::new(b"abc");
        let err = reader.read_cstr().unwrap_err();
        assert!(matches!(err, ByteError::UnterminatedString { start: 0 }));
    }

    #[test]
    fn seek_and_skip() {
        let mut reader = ByteReader::new(&[0, 1, 2, 3, 4]);
        reader.skip(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 2);
        reader.seek(0).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 0);
        assert!(reader.seek(6).is_err());
        assert!(reader.skip(10).is_err());
    }

    #[test]
    fn rest_and_peek() {
        let mut reader = ByteReader::new(&[9, 8, 7]);
        reader.skip(1).unwrap();
        assert_eq!(reader.peek_u8(), Some(8));
        assert_eq!(reader.rest(), &[8, 7]);
    }
}
