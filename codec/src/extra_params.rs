//! Extra parameter blocks: flexible, light, sculpt, light image and mesh.
//!
//! ```text
//! count: u8
//! count x { kind: u16, len: u32, data: [u8; len] }
//! ```

use bitstream::ByteReader;
use glam::Vec3;
use texture::Color4;
use uuid::Uuid;
use wire::{DecodeLimits, LimitKind, ReadExt};

use crate::error::{check_limit, CodecError, CodecResult};

/// Extra parameter kinds.
pub mod kind {
    pub const FLEXIBLE: u16 = 0x10;
    pub const LIGHT: u16 = 0x20;
    pub const SCULPT: u16 = 0x30;
    pub const LIGHT_IMAGE: u16 = 0x40;
    pub const MESH: u16 = 0x60;
}

/// Flexible-path simulation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexibleData {
    pub softness: u8,
    pub tension: f32,
    pub drag: f32,
    pub gravity: f32,
    pub wind: f32,
    pub force: Vec3,
}

impl FlexibleData {
    const SIZE: usize = 16;

    fn read(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        let [b0, b1, b2, b3] = reader.read_array::<4>()?;
        Ok(Self {
            softness: ((b0 & 0x80) >> 6) | ((b1 & 0x80) >> 7),
            tension: f32::from(b0 & 0x7F) / 10.0,
            drag: f32::from(b1 & 0x7F) / 10.0,
            gravity: f32::from(b2) / 10.0 - 10.0,
            wind: f32::from(b3) / 10.0,
            force: reader.read_vec3()?,
        })
    }
}

/// Point light settings. The color's alpha is the intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    pub color: Color4,
    pub radius: f32,
    pub cutoff: f32,
    pub falloff: f32,
}

impl LightData {
    const SIZE: usize = 16;

    fn read(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            color: Color4::from_bytes(reader.read_array::<4>()?),
            radius: reader.read_f32()?,
            cutoff: reader.read_f32()?,
            falloff: reader.read_f32()?,
        })
    }
}

/// Sculpt map or mesh asset reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SculptData {
    pub texture: Uuid,
    pub sculpt_type: u8,
}

impl SculptData {
    const SIZE: usize = 17;

    fn read(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            texture: reader.read_uuid()?,
            sculpt_type: reader.read_u8()?,
        })
    }
}

/// Projected light texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightImage {
    pub texture: Uuid,
    /// Field of view, focus and ambiance.
    pub params: Vec3,
}

impl LightImage {
    const SIZE: usize = 28;

    fn read(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            texture: reader.read_uuid()?,
            params: reader.read_vec3()?,
        })
    }
}

/// Decoded extra parameters of one primitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtraParams {
    pub flexible: Option<FlexibleData>,
    pub light: Option<LightData>,
    pub sculpt: Option<SculptData>,
    pub light_image: Option<LightImage>,
    pub mesh: Option<SculptData>,
    /// Entries of kinds this client does not interpret.
    pub unknown: Vec<(u16, Vec<u8>)>,
}

impl ExtraParams {
    /// Parses an extra-params block from an owned field.
    ///
    /// # Errors
    ///
    /// Fails when the block is truncated or holds more entries than
    /// `limits` allows.
    pub fn parse(raw: &[u8], limits: &DecodeLimits) -> CodecResult<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        Self::read(&mut ByteReader::new(raw), limits)
    }

    /// Reads an extra-params block in place, leaving `reader` after it.
    ///
    /// # Errors
    ///
    /// See [`ExtraParams::parse`].
    pub fn read(reader: &mut ByteReader<'_>, limits: &DecodeLimits) -> CodecResult<Self> {
        let count = usize::from(reader.read_u8()?);
        check_limit(LimitKind::ExtraParams, limits.max_extra_params, count)?;

        let mut params = Self::default();
        for _ in 0..count {
            let kind = reader.read_u16()?;
            let len = reader.read_u32()? as usize;
            if len > reader.remaining() {
                return Err(CodecError::LengthPrefix {
                    field: "extra param",
                    declared: len,
                    available: reader.remaining(),
                });
            }
            let data = reader.read_bytes(len)?;
            params.insert(kind, data)?;
        }
        Ok(params)
    }

    fn insert(&mut self, kind: u16, data: &[u8]) -> CodecResult<()> {
        let mut reader = ByteReader::new(data);
        match kind {
            kind::FLEXIBLE if data.len() >= FlexibleData::SIZE => {
                self.flexible = Some(FlexibleData::read(&mut reader)?);
            }
            kind::LIGHT if data.len() >= LightData::SIZE => {
                self.light = Some(LightData::read(&mut reader)?);
            }
            kind::SCULPT if data.len() >= SculptData::SIZE => {
                self.sculpt = Some(SculptData::read(&mut reader)?);
            }
            kind::LIGHT_IMAGE if data.len() >= LightImage::SIZE => {
                self.light_image = Some(LightImage::read(&mut reader)?);
            }
            kind::MESH if data.len() >= SculptData::SIZE => {
                self.mesh = Some(SculptData::read(&mut reader)?);
            }
            other => self.unknown.push((other, data.to_vec())),
        }
        Ok(())
    }

    /// Texture of the sculpt map, or the mesh asset for mesh objects.
    #[must_use]
    pub fn sculpt_texture(&self) -> Option<Uuid> {
        self.mesh.or(self.sculpt).map(|s| s.texture)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use bitstream::ByteWriter;
    use wire::WriteExt;

    use super::*;

    fn entry(writer: &mut ByteWriter, kind: u16, data: &[u8]) {
        writer.write_u16(kind);
        writer.write_u32(data.len() as u32);
        writer.write_bytes(data);
    }

    #[test]
    fn empty_and_zero_count() {
        assert!(ExtraParams::parse(&[], &DecodeLimits::default())
            .unwrap()
            .is_empty());
        assert!(ExtraParams::parse(&[0], &DecodeLimits::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn sculpt_and_light() {
        let sculpt_id = Uuid::from_u128(0x5C);
        let mut sculpt = ByteWriter::new();
        sculpt.write_uuid(sculpt_id);
        sculpt.write_u8(2);

        let mut light = ByteWriter::new();
        light.write_bytes(&[255, 0, 0, 128]);
        light.write_f32(10.0);
        light.write_f32(0.0);
        light.write_f32(0.75);

        let mut writer = ByteWriter::new();
        writer.write_u8(2);
        entry(&mut writer, kind::SCULPT, &sculpt.finish());
        entry(&mut writer, kind::LIGHT, &light.finish());
        let bytes = writer.finish();

        let params = ExtraParams::parse(&bytes, &DecodeLimits::default()).unwrap();
        assert_eq!(params.sculpt_texture(), Some(sculpt_id));
        assert_eq!(params.sculpt.unwrap().sculpt_type, 2);
        let light = params.light.unwrap();
        assert_eq!(light.radius, 10.0);
        assert_eq!(light.color.r, 1.0);
        assert_eq!(light.falloff, 0.75);
    }

    #[test]
    fn mesh_wins_sculpt_texture() {
        let mut data = Uuid::from_u128(0x3E5).as_bytes().to_vec();
        data.push(5);
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        entry(&mut writer, kind::MESH, &data);
        let params = ExtraParams::parse(&writer.finish(), &DecodeLimits::default()).unwrap();
        assert_eq!(params.sculpt_texture(), Some(Uuid::from_u128(0x3E5)));
        assert!(params.sculpt.is_none());
    }

    #[test]
    fn flexible_bits() {
        let mut data = vec![0x80 | 20, 0x80 | 5, 110, 30];
        data.extend_from_slice(&[0; 12]);
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        entry(&mut writer, kind::FLEXIBLE, &data);
        let flex = ExtraParams::parse(&writer.finish(), &DecodeLimits::default())
            .unwrap()
            .flexible
            .unwrap();
        assert_eq!(flex.softness, 3);
        assert_eq!(flex.tension, 2.0);
        assert_eq!(flex.drag, 0.5);
        assert!((flex.gravity - 1.0).abs() < 1e-6);
        assert_eq!(flex.wind, 3.0);
    }

    #[test]
    fn unknown_kind_is_kept() {
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        entry(&mut writer, 0x70, &[1, 2, 3]);
        let params = ExtraParams::parse(&writer.finish(), &DecodeLimits::default()).unwrap();
        assert_eq!(params.unknown, vec![(0x70, vec![1, 2, 3])]);
    }

    #[test]
    fn length_past_end() {
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        writer.write_u16(kind::SCULPT);
        writer.write_u32(100);
        writer.write_bytes(&[0; 4]);
        assert!(matches!(
            ExtraParams::parse(&writer.finish(), &DecodeLimits::default()),
            Err(CodecError::LengthPrefix { .. })
        ));
    }

    #[test]
    fn count_over_limit() {
        assert!(matches!(
            ExtraParams::parse(&[5], &DecodeLimits::for_testing()),
            Err(CodecError::LimitsExceeded { .. })
        ));
    }
}
