use bitstream::quantize::{float_to_u16, float_to_u8, u16_to_float, u8_to_float};
use bitstream::{read_face_bitfield, write_face_bitfield, ByteReader, ByteWriter};
use proptest::prelude::*;

const DOMAINS: [(f32, f32); 6] = [
    (-256.0, 256.0),
    (-128.0, 128.0),
    (-64.0, 64.0),
    (-1.0, 1.0),
    (-128.0, 384.0),
    (-256.0, 768.0),
];

fn domain_and_value() -> impl Strategy<Value = (f32, f32, f32)> {
    (0..DOMAINS.len(), 0.0f32..=1.0).prop_map(|(idx, t)| {
        let (lower, upper) = DOMAINS[idx];
        (lower, upper, lower + t * (upper - lower))
    })
}

proptest! {
    #[test]
    fn prop_u16_quantization_within_one_step((lower, upper, value) in domain_and_value()) {
        let back = u16_to_float(float_to_u16(value, lower, upper), lower, upper);
        let step = (upper - lower) / 65535.0;
        prop_assert!((back - value).abs() <= step, "{value} -> {back} in [{lower}, {upper}]");
    }

    #[test]
    fn prop_u8_quantization_within_one_step((lower, upper, value) in domain_and_value()) {
        let back = u8_to_float(float_to_u8(value, lower, upper), lower, upper);
        let step = (upper - lower) / 255.0;
        prop_assert!((back - value).abs() <= step, "{value} -> {back} in [{lower}, {upper}]");
    }

    #[test]
    fn prop_face_bitfields_roundtrip(masks in prop::collection::vec(1u32.., 0..16)) {
        let mut writer = ByteWriter::new();
        for mask in &masks {
            write_face_bitfield(&mut writer, *mask);
        }
        write_face_bitfield(&mut writer, 0);
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        for mask in &masks {
            prop_assert_eq!(read_face_bitfield(&mut reader).unwrap(), *mask);
        }
        prop_assert_eq!(read_face_bitfield(&mut reader).unwrap(), 0);
        prop_assert!(reader.is_empty());
    }
}
