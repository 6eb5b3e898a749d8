use proptest::prelude::*;
use texture::{Color4, TextureEntry, Uuid, MAX_FACES};

use bitstream_values::*;

/// Attribute values that survive quantization exactly.
mod bitstream_values {
    use std::f32::consts::TAU;

    pub fn offset(raw: i16) -> f32 {
        f32::from(raw) / 32767.0
    }

    pub fn rotation(raw: i16) -> f32 {
        f32::from(raw) / 32768.0 * TAU
    }

    pub fn glow(raw: u8) -> f32 {
        f32::from(raw) / 255.0
    }

    pub fn channel(raw: u8) -> f32 {
        f32::from(255 - raw) / 255.0
    }
}

#[derive(Clone, Debug)]
enum Attr {
    Texture(u128),
    Rgba([u8; 4]),
    RepeatU(f32),
    RepeatV(f32),
    OffsetU(i16),
    OffsetV(i16),
    Rotation(i16),
    Material(u8),
    Media(u8),
    Glow(u8),
    MaterialId(u128),
}

fn attr_strategy() -> impl Strategy<Value = Attr> {
    // a small id space makes coalescing likely
    prop_oneof![
        (0u128..4).prop_map(Attr::Texture),
        any::<[u8; 4]>().prop_map(Attr::Rgba),
        (-100.0f32..100.0).prop_map(Attr::RepeatU),
        (-100.0f32..100.0).prop_map(Attr::RepeatV),
        (-32767i16..=32767).prop_map(Attr::OffsetU),
        (-32767i16..=32767).prop_map(Attr::OffsetV),
        (-16383i16..=16383).prop_map(Attr::Rotation),
        any::<u8>().prop_map(Attr::Material),
        any::<u8>().prop_map(Attr::Media),
        any::<u8>().prop_map(Attr::Glow),
        (0u128..3).prop_map(Attr::MaterialId),
    ]
}

fn apply(entry: &mut TextureEntry, face: usize, attr: &Attr) {
    let face = entry.create_face(face).unwrap();
    match *attr {
        Attr::Texture(id) => face.set_texture_id(Uuid::from_u128(id)),
        Attr::Rgba(raw) => face.set_rgba(Color4::from_array(raw.map(channel))),
        Attr::RepeatU(v) => face.set_repeat_u(v),
        Attr::RepeatV(v) => face.set_repeat_v(v),
        Attr::OffsetU(raw) => face.set_offset_u(offset(raw)),
        Attr::OffsetV(raw) => face.set_offset_v(offset(raw)),
        Attr::Rotation(raw) => face.set_rotation(rotation(raw)),
        Attr::Material(m) => face.set_material(m),
        Attr::Media(m) => face.set_media(m),
        Attr::Glow(raw) => face.set_glow(glow(raw)),
        Attr::MaterialId(id) => face.set_material_id(Uuid::from_u128(id)),
    };
}

proptest! {
    #[test]
    fn prop_entry_roundtrip(
        default_id in any::<u128>(),
        overrides in prop::collection::vec(
            (0..MAX_FACES, prop::collection::vec(attr_strategy(), 0..4)),
            0..=MAX_FACES,
        ),
    ) {
        let mut entry = TextureEntry::new(Uuid::from_u128(default_id));
        for (face, attrs) in &overrides {
            entry.create_face(*face).unwrap();
            for attr in attrs {
                apply(&mut entry, *face, attr);
            }
        }

        let decoded = TextureEntry::from_bytes(&entry.to_bytes()).unwrap();
        for index in 0..MAX_FACES {
            prop_assert_eq!(
                decoded.face(index).unwrap().resolve(),
                entry.face(index).unwrap().resolve(),
                "face {}", index
            );
        }
        prop_assert_eq!(&decoded, &entry);
    }

    #[test]
    fn prop_records_roundtrip(
        overrides in prop::collection::vec(
            (0..MAX_FACES, prop::collection::vec(attr_strategy(), 1..4)),
            0..8,
        ),
    ) {
        let mut entry = TextureEntry::new(Uuid::from_u128(9));
        for (face, attrs) in &overrides {
            for attr in attrs {
                apply(&mut entry, *face, attr);
            }
        }
        let back = TextureEntry::from_records(&entry.to_records()).unwrap();
        prop_assert_eq!(back, entry);
    }

    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = TextureEntry::from_bytes(&data);
    }
}
