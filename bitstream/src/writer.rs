//! Little-endian byte writer for encoding packed wire data.

/// A growable byte writer for encoding packed little-endian wire data.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes the bytes followed by a null terminator.
    pub fn write_cstr(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
        self.bytes.push(0);
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert_eq!(writer.len(), 0);
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn writes_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0xABCD);
        writer.write_u32(0x1234_5678);
        assert_eq!(writer.finish(), vec![0xCD, 0xAB, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn writes_signed() {
        let mut writer = ByteWriter::new();
        writer.write_i8(-1);
        writer.write_i16(-2);
        assert_eq!(writer.finish(), vec![0xFF, 0xFE, 0xFF]);
    }

    #[test]
    fn writes_cstr() {
        let mut writer = ByteWriter::with_capacity(8);
        writer.write_cstr(b"hi");
        assert_eq!(writer.finish(), vec![b'h', b'i', 0]);
    }

    #[test]
    fn finish_into() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);

        let mut buf = vec![0x00, 0x11];
        writer.finish_into(&mut buf);
        assert_eq!(buf, vec![0x00, 0x11, 0xAB]);
    }
}
