//! The decoded form of full and compressed object updates.

use bitstream::ByteReader;
use glam::Vec3;
use texture::Color4;
use uuid::Uuid;
use wire::{JointType, PCode, PrimFlags};

use crate::construction::ConstructionData;
use crate::error::CodecResult;
use crate::extra_params::ExtraParams;
use crate::motion::ObjectMovementUpdate;
use crate::name_value::NameValues;

/// Size of the legacy particle system block.
pub const PARTICLE_BLOCK_SIZE: usize = 86;

/// Animated texture settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureAnimation {
    pub flags: u8,
    pub face: u8,
    pub size_x: u8,
    pub size_y: u8,
    pub start: f32,
    pub length: f32,
    pub rate: f32,
}

impl TextureAnimation {
    pub const SIZE: usize = 16;

    pub const ON: u8 = 0x01;
    pub const LOOP: u8 = 0x02;
    pub const REVERSE: u8 = 0x04;
    pub const PING_PONG: u8 = 0x08;
    pub const SMOOTH: u8 = 0x10;
    pub const ROTATE: u8 = 0x20;
    pub const SCALE: u8 = 0x40;

    /// Parses the 16-byte animation block.
    ///
    /// # Errors
    ///
    /// Fails when fewer than 16 bytes are available.
    pub fn read(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            flags: reader.read_u8()?,
            face: reader.read_u8()?,
            size_x: reader.read_u8()?,
            size_y: reader.read_u8()?,
            start: reader.read_f32()?,
            length: reader.read_f32()?,
            rate: reader.read_f32()?,
        })
    }

    /// Parses a block stored in its own field; empty or short fields mean
    /// no animation.
    #[must_use]
    pub fn from_field(raw: &[u8]) -> Option<Self> {
        if raw.len() < Self::SIZE {
            return None;
        }
        Self::read(&mut ByteReader::new(raw)).ok()
    }
}

/// Looped sound attached to an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundInfo {
    pub sound_id: Uuid,
    pub gain: f32,
    pub flags: u8,
    pub radius: f32,
}

/// Physics joint of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointInfo {
    pub joint_type: JointType,
    pub pivot: Vec3,
    pub axis_or_anchor: Vec3,
}

/// Raw particle system block. Consumers that render particles parse it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParticleBlock(Vec<u8>);

impl ParticleBlock {
    #[must_use]
    pub fn new(raw: Vec<u8>) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a full or compressed update says about one object.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedObject {
    pub movement: ObjectMovementUpdate,
    pub full_id: Uuid,
    pub owner_id: Uuid,
    pub parent_id: u32,
    pub pcode: PCode,
    pub crc: u32,
    pub click_action: u8,
    pub scale: Vec3,
    pub flags: PrimFlags,
    pub construction: ConstructionData,
    pub name_values: NameValues,
    pub attachment: bool,
    pub extra_params: ExtraParams,
    pub texture_anim: Option<TextureAnimation>,
    pub text: String,
    pub text_color: Color4,
    pub media_url: Option<String>,
    pub particles: Option<ParticleBlock>,
    pub sound: Option<SoundInfo>,
    pub tree_species: Option<u8>,
    pub scratch_pad: Vec<u8>,
    pub joint: JointInfo,
}

impl DecodedObject {
    #[must_use]
    pub fn local_id(&self) -> u32 {
        self.movement.local_id
    }

    #[must_use]
    pub fn is_avatar(&self) -> bool {
        self.pcode == PCode::Avatar
    }
}

/// Text field contents up to the first NUL.
pub(crate) fn text_field(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_anim_from_field() {
        let mut raw = vec![TextureAnimation::ON | TextureAnimation::LOOP, 255, 4, 2];
        raw.extend_from_slice(&0.0f32.to_le_bytes());
        raw.extend_from_slice(&8.0f32.to_le_bytes());
        raw.extend_from_slice(&10.0f32.to_le_bytes());
        let anim = TextureAnimation::from_field(&raw).unwrap();
        assert_eq!(anim.face, 255);
        assert_eq!(anim.size_x, 4);
        assert_eq!(anim.length, 8.0);
        assert_eq!(anim.rate, 10.0);
        assert!(TextureAnimation::from_field(&raw[..10]).is_none());
    }

    #[test]
    fn text_field_stops_at_nul() {
        assert_eq!(text_field(b"hello\0junk"), "hello");
        assert_eq!(text_field(b"plain"), "plain");
        assert_eq!(text_field(b""), "");
    }
}
