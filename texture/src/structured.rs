//! Structured, per-face form of a texture entry.
//!
//! Used where entries travel as documents instead of packed bytes: one
//! [`FaceRecord`] per face, the default face tagged `face_number = -1`.
//! No delta compression is applied.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::entry::{TextureEntry, MAX_FACES};
use crate::error::{TextureError, TextureResult};
use crate::face::{
    pack_material, pack_media, Color4, FaceAttributes, BUMP_MASK, FULLBRIGHT_MASK,
    MEDIA_FLAG_MASK, SHINY_MASK, TEX_GEN_MASK,
};

/// Face number used for the default face.
pub const DEFAULT_FACE_NUMBER: i32 = -1;

/// One face of a texture entry in structured form.
///
/// Fields are optional so that override records carry only what they set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceRecord {
    pub face_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imageid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalet: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsett: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagerot: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bump: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullbright: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shiny: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_flags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materialid: Option<Uuid>,
}

impl Default for FaceRecord {
    fn default() -> Self {
        Self {
            face_number: DEFAULT_FACE_NUMBER,
            imageid: None,
            colors: None,
            scales: None,
            scalet: None,
            offsets: None,
            offsett: None,
            imagerot: None,
            bump: None,
            fullbright: None,
            shiny: None,
            media_flags: None,
            mapping: None,
            glow: None,
            materialid: None,
        }
    }
}

impl FaceRecord {
    fn from_face(face_number: i32, face: &FaceAttributes) -> Self {
        let material = face.material();
        let media = face.media();
        Self {
            face_number,
            imageid: face.texture_id(),
            colors: face.rgba().map(Color4::to_array),
            scales: face.repeat_u(),
            scalet: face.repeat_v(),
            offsets: face.offset_u(),
            offsett: face.offset_v(),
            imagerot: face.rotation(),
            bump: material.map(|m| m & BUMP_MASK),
            fullbright: material.map(|m| m & FULLBRIGHT_MASK != 0),
            shiny: material.map(|m| (m & SHINY_MASK) >> 6),
            media_flags: media.map(|m| m & MEDIA_FLAG_MASK != 0),
            mapping: media.map(|m| (m & TEX_GEN_MASK) >> 1),
            glow: face.glow(),
            materialid: face.material_id(),
        }
    }

    /// Applies every field this record carries. The parts of the material and
    /// media bytes the record leaves out come from `material` and `media`.
    fn apply(&self, face: &mut FaceAttributes, material: u8, media: u8) {
        if let Some(id) = self.imageid {
            face.set_texture_id(id);
        }
        if let Some(colors) = self.colors {
            face.set_rgba(Color4::from_array(colors));
        }
        if let Some(v) = self.scales {
            face.set_repeat_u(v);
        }
        if let Some(v) = self.scalet {
            face.set_repeat_v(v);
        }
        if let Some(v) = self.offsets {
            face.set_offset_u(v);
        }
        if let Some(v) = self.offsett {
            face.set_offset_v(v);
        }
        if let Some(v) = self.imagerot {
            face.set_rotation(v);
        }
        if self.bump.is_some() || self.fullbright.is_some() || self.shiny.is_some() {
            face.set_material(pack_material(
                self.bump.unwrap_or(material & BUMP_MASK),
                self.fullbright.unwrap_or(material & FULLBRIGHT_MASK != 0),
                self.shiny.unwrap_or((material & SHINY_MASK) >> 6),
            ));
        }
        if self.media_flags.is_some() || self.mapping.is_some() {
            face.set_media(pack_media(
                self.media_flags.unwrap_or(media & MEDIA_FLAG_MASK != 0),
                self.mapping.unwrap_or((media & TEX_GEN_MASK) >> 1),
            ));
        }
        if let Some(v) = self.glow {
            face.set_glow(v);
        }
        if let Some(id) = self.materialid {
            face.set_material_id(id);
        }
    }
}

impl TextureEntry {
    /// Structured form: the default face first, then every override.
    #[must_use]
    pub fn to_records(&self) -> Vec<FaceRecord> {
        let mut default = FaceAttributes::empty();
        let d = self.default_face();
        default
            .set_texture_id(d.texture_id())
            .set_rgba(d.rgba())
            .set_repeat_u(d.repeat_u())
            .set_repeat_v(d.repeat_v())
            .set_offset_u(d.offset_u())
            .set_offset_v(d.offset_v())
            .set_rotation(d.rotation())
            .set_material(d.material())
            .set_media(d.media())
            .set_glow(d.glow())
            .set_material_id(d.material_id());

        std::iter::once(FaceRecord::from_face(DEFAULT_FACE_NUMBER, &default))
            .chain(self.overrides().filter(|(_, face)| !face.present().is_empty()).map(
                |(index, face)| FaceRecord::from_face(index as i32, face),
            ))
            .collect()
    }

    /// Rebuilds an entry from its structured form.
    ///
    /// Records with a negative face number update the default face and are
    /// applied before any per-face record.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::NoSuchFace`] for a face number of 32 or more.
    pub fn from_records(records: &[FaceRecord]) -> TextureResult<Self> {
        let mut entry = Self::default();

        for record in records.iter().filter(|r| r.face_number < 0) {
            let (material, media) = (entry.default_face().material(), entry.default_face().media());
            record.apply(entry.default_face_mut(), material, media);
        }

        for record in records.iter().filter(|r| r.face_number >= 0) {
            let face = entry.face(record.face_number as usize).map_err(|_| {
                TextureError::NoSuchFace {
                    index: i64::from(record.face_number),
                    max: MAX_FACES,
                }
            })?;
            let (material, media) = (face.material(), face.media());
            record.apply(entry.face_slot(record.face_number as usize), material, media);
        }

        Ok(entry)
    }
}

impl Serialize for TextureEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_records().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextureEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<FaceRecord>::deserialize(deserializer)?;
        Self::from_records(&records).map_err(serde::de::Error::custom)
    }
}
