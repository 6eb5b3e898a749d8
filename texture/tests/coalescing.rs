//! Byte-level checks of section coalescing and terminators.

use bitstream::{read_face_bitfield, ByteReader};
use texture::{TextureEntry, Uuid};

/// Reads the texture-id section and returns its `(bitfield, id)` pairs.
fn texture_pairs(bytes: &[u8]) -> Vec<(u32, Uuid)> {
    let mut reader = ByteReader::new(bytes);
    reader.read_array::<16>().unwrap();
    let mut pairs = Vec::new();
    loop {
        let bits = read_face_bitfield(&mut reader).unwrap();
        if bits == 0 {
            break;
        }
        pairs.push((bits, Uuid::from_bytes(reader.read_array::<16>().unwrap())));
    }
    pairs
}

#[test]
fn shared_value_is_one_pair() {
    let shared = Uuid::from_u128(77);
    let mut entry = TextureEntry::new(Uuid::from_u128(1));
    for face in [2, 5, 9] {
        entry.create_face(face).unwrap().set_texture_id(shared);
    }

    let pairs = texture_pairs(&entry.to_bytes());
    assert_eq!(pairs, vec![((1 << 2) | (1 << 5) | (1 << 9), shared)]);
}

#[test]
fn distinct_values_are_separate_pairs() {
    let mut entry = TextureEntry::new(Uuid::from_u128(1));
    entry.create_face(0).unwrap().set_texture_id(Uuid::from_u128(2));
    entry.create_face(1).unwrap().set_texture_id(Uuid::from_u128(3));
    entry.create_face(4).unwrap().set_texture_id(Uuid::from_u128(2));

    let pairs = texture_pairs(&entry.to_bytes());
    assert_eq!(
        pairs,
        vec![
            ((1 << 0) | (1 << 4), Uuid::from_u128(2)),
            (1 << 1, Uuid::from_u128(3)),
        ]
    );
}

#[test]
fn face_31_needs_five_byte_bitfield() {
    let mut entry = TextureEntry::new(Uuid::nil());
    entry.create_face(31).unwrap().set_texture_id(Uuid::from_u128(5));
    let bytes = entry.to_bytes();
    assert_eq!(&bytes[16..21], &[0x88, 0x80, 0x80, 0x80, 0x00]);

    let decoded = TextureEntry::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.face(31).unwrap().texture_id(), Uuid::from_u128(5));
}

#[test]
fn terminator_is_never_followed_by_value() {
    // texture section: default + terminator, then rgba default + terminator
    let mut bytes = Uuid::from_u128(3).as_bytes().to_vec();
    bytes.push(0x00);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.push(0x00);

    let entry = TextureEntry::from_bytes(&bytes).unwrap();
    assert_eq!(entry.override_count(), 0);
    assert_eq!(entry.face(0).unwrap().texture_id(), Uuid::from_u128(3));
    // the rgba default was read from the bytes after the terminator
    assert_eq!(entry.face(0).unwrap().rgba(), texture::Color4::WHITE);
}

#[test]
fn every_section_ends_with_terminator() {
    let entry = TextureEntry::new(Uuid::from_u128(1));
    let bytes = entry.to_bytes();
    let widths = [16, 4, 4, 4, 2, 2, 2, 1, 1, 1, 16];
    let mut at = 0;
    for width in widths {
        at += width;
        assert_eq!(bytes[at], 0x00, "terminator after {width}-byte default");
        at += 1;
    }
    assert_eq!(at, bytes.len());
}
