use bitstream::quantize::{float_to_u16, float_to_u8, u16_to_float, u8_to_float};
use bitstream::{read_face_bitfield, write_face_bitfield, ByteReader, ByteWriter};

#[test]
fn delta_section_shape_roundtrip() {
    // default value, one (bitfield, value) pair, terminator
    let mut writer = ByteWriter::new();
    writer.write_u8(1);
    write_face_bitfield(&mut writer, (1 << 2) | (1 << 5) | (1 << 9));
    writer.write_u8(7);
    write_face_bitfield(&mut writer, 0);
    let bytes = writer.finish();

    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 1);
    assert_eq!(
        read_face_bitfield(&mut reader).unwrap(),
        (1 << 2) | (1 << 5) | (1 << 9)
    );
    assert_eq!(reader.read_u8().unwrap(), 7);
    assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0);
    assert!(reader.is_empty());
}

#[test]
fn quantized_all_max_decodes_to_domain_max() {
    assert_eq!(u16_to_float(float_to_u16(384.0, -128.0, 384.0), -128.0, 384.0), 384.0);
    assert_eq!(u8_to_float(float_to_u8(256.0, -256.0, 256.0), -256.0, 256.0), 256.0);
}
