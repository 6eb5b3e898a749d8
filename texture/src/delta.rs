//! Bitfield-delta binary form of a texture entry.
//!
//! Every attribute is written as one section:
//!
//! ```text
//! default value | (face bitfield, value)* | 0x00
//! ```
//!
//! Faces sharing an identical non-default value are coalesced into a single
//! bitfield. Sections follow a fixed order; a stream that ends early leaves
//! the remaining attributes at their defaults.

use bitstream::quantize::{
    te_glow_byte, te_glow_float, te_offset_float, te_offset_short, te_rotation_float,
    te_rotation_short,
};
use bitstream::{read_face_bitfield, write_face_bitfield, ByteReader, ByteWriter};
use uuid::Uuid;

use crate::entry::{TextureEntry, MAX_FACES};
use crate::error::TextureResult;
use crate::face::{Color4, FaceAttributes, FaceView};

/// Writes one section, coalescing faces that share a value.
fn write_section<const N: usize>(
    writer: &mut ByteWriter,
    default: [u8; N],
    faces: &[Option<[u8; N]>; MAX_FACES],
) {
    writer.write_bytes(&default);

    let mut sent = [false; MAX_FACES];
    for (index, value) in faces.iter().enumerate() {
        let Some(value) = value else { continue };
        if sent[index] || *value == default {
            continue;
        }

        let mut bits = 0u32;
        for (other, candidate) in faces.iter().enumerate().skip(index) {
            if candidate.as_ref() == Some(value) {
                bits |= 1 << other;
                sent[other] = true;
            }
        }
        write_face_bitfield(writer, bits);
        writer.write_bytes(value);
    }

    write_face_bitfield(writer, 0);
}

/// Reads one section into `entry`.
///
/// Returns `false` when the stream ended inside the section, in which case
/// no further sections should be read.
fn read_section<const N: usize>(
    reader: &mut ByteReader<'_>,
    entry: &mut TextureEntry,
    apply: impl Fn(&mut FaceAttributes, [u8; N]),
) -> TextureResult<bool> {
    if reader.remaining() < N {
        return Ok(false);
    }
    let default = reader.read_array::<N>()?;
    apply(entry.default_face_mut(), default);

    loop {
        let bits = read_face_bitfield(reader)?;
        if bits == 0 {
            return Ok(true);
        }
        if reader.remaining() < N {
            return Ok(false);
        }
        let value = reader.read_array::<N>()?;
        for face in (0..MAX_FACES).filter(|face| bits & (1 << face) != 0) {
            apply(entry.face_slot(face), value);
        }
    }
}

impl TextureEntry {
    fn section_bytes<const N: usize>(
        &self,
        writer: &mut ByteWriter,
        default: [u8; N],
        own: impl Fn(&FaceAttributes) -> Option<[u8; N]>,
    ) {
        let slots = self.override_slots();
        let faces: [Option<[u8; N]>; MAX_FACES] =
            std::array::from_fn(|index| slots[index].as_ref().and_then(&own));
        write_section(writer, default, &faces);
    }

    /// Encodes the entry in its binary wire form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let d: FaceView<'_> = self.default_face();
        let mut writer = ByteWriter::with_capacity(64);

        self.section_bytes(&mut writer, *d.texture_id().as_bytes(), |f| {
            f.texture_id().map(|id| *id.as_bytes())
        });
        self.section_bytes(&mut writer, d.rgba().to_inverted_bytes(), |f| {
            f.rgba().map(Color4::to_inverted_bytes)
        });
        self.section_bytes(&mut writer, d.repeat_u().to_le_bytes(), |f| {
            f.repeat_u().map(f32::to_le_bytes)
        });
        self.section_bytes(&mut writer, d.repeat_v().to_le_bytes(), |f| {
            f.repeat_v().map(f32::to_le_bytes)
        });
        self.section_bytes(&mut writer, te_offset_short(d.offset_u()).to_le_bytes(), |f| {
            f.offset_u().map(|v| te_offset_short(v).to_le_bytes())
        });
        self.section_bytes(&mut writer, te_offset_short(d.offset_v()).to_le_bytes(), |f| {
            f.offset_v().map(|v| te_offset_short(v).to_le_bytes())
        });
        self.section_bytes(&mut writer, te_rotation_short(d.rotation()).to_le_bytes(), |f| {
            f.rotation().map(|v| te_rotation_short(v).to_le_bytes())
        });
        self.section_bytes(&mut writer, [d.material()], |f| f.material().map(|m| [m]));
        self.section_bytes(&mut writer, [d.media()], |f| f.media().map(|m| [m]));
        self.section_bytes(&mut writer, [te_glow_byte(d.glow())], |f| {
            f.glow().map(|g| [te_glow_byte(g)])
        });
        self.section_bytes(&mut writer, *d.material_id().as_bytes(), |f| {
            f.material_id().map(|id| *id.as_bytes())
        });

        writer.finish()
    }

    /// Decodes an entry from its binary wire form.
    ///
    /// Sections missing from the end of `data` keep their defaults. An empty
    /// slice yields an entry with a nil default texture.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Malformed`](crate::TextureError::Malformed) if a
    /// face bitfield is longer than any valid face mask.
    pub fn from_bytes(data: &[u8]) -> TextureResult<Self> {
        let mut entry = Self::default();
        let mut reader = ByteReader::new(data);
        let r = &mut reader;
        let e = &mut entry;

        // Stops at the first section the stream does not fully contain.
        let _complete = read_section(r, e, |f, v: [u8; 16]| {
            f.set_texture_id(Uuid::from_bytes(v));
        })? && read_section(r, e, |f, v: [u8; 4]| {
            f.set_rgba(Color4::from_inverted_bytes(v));
        })? && read_section(r, e, |f, v: [u8; 4]| {
            f.set_repeat_u(f32::from_le_bytes(v));
        })? && read_section(r, e, |f, v: [u8; 4]| {
            f.set_repeat_v(f32::from_le_bytes(v));
        })? && read_section(r, e, |f, v: [u8; 2]| {
            f.set_offset_u(te_offset_float(i16::from_le_bytes(v)));
        })? && read_section(r, e, |f, v: [u8; 2]| {
            f.set_offset_v(te_offset_float(i16::from_le_bytes(v)));
        })? && read_section(r, e, |f, v: [u8; 2]| {
            f.set_rotation(te_rotation_float(i16::from_le_bytes(v)));
        })? && read_section(r, e, |f, [v]: [u8; 1]| {
            f.set_material(v);
        })? && read_section(r, e, |f, [v]: [u8; 1]| {
            f.set_media(v);
        })? && read_section(r, e, |f, [v]: [u8; 1]| {
            f.set_glow(te_glow_float(v));
        })? && read_section(r, e, |f, v: [u8; 16]| {
            f.set_material_id(Uuid::from_bytes(v));
        })?;

        Ok(entry)
    }
}
