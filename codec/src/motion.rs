//! Packed motion data and the normalized movement update.
//!
//! Full updates carry motion state in one of five layouts, told apart only
//! by their length:
//!
//! | Length | Layout                                  |
//! |--------|-----------------------------------------|
//! | 76     | collision plane + full precision        |
//! | 60     | full precision                          |
//! | 48     | collision plane + 16-bit quantized      |
//! | 32     | 16-bit quantized                        |
//! | 16     | 8-bit quantized                         |

use bitstream::quantize::{float_to_u16, float_to_u8, u16_to_float, u8_to_float};
use bitstream::{ByteReader, ByteWriter};
use glam::{Quat, Vec3, Vec4};
use texture::TextureEntry;
use wire::{ReadExt, WriteExt};

use crate::error::{CodecError, CodecResult};

/// Quantization domain of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub lower: f32,
    pub upper: f32,
}

impl Domain {
    pub const fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    fn read_u16(self, reader: &mut ByteReader<'_>) -> CodecResult<f32> {
        Ok(u16_to_float(reader.read_u16()?, self.lower, self.upper))
    }

    fn read_u8(self, reader: &mut ByteReader<'_>) -> CodecResult<f32> {
        Ok(u8_to_float(reader.read_u8()?, self.lower, self.upper))
    }
}

/// Position X/Y in the 16-bit layouts.
pub const POSITION_XY_16: Domain = Domain::new(-128.0, 384.0);
/// Position Z in the 16-bit layouts.
pub const POSITION_Z_16: Domain = Domain::new(-256.0, 768.0);
/// Velocity, acceleration and angular velocity in the 16-bit layouts, and
/// every vector in the 8-bit layout.
pub const MOTION_WIDE: Domain = Domain::new(-256.0, 256.0);
/// Quaternion components in every quantized layout.
pub const ROTATION_COMPONENT: Domain = Domain::new(-1.0, 1.0);
/// Terse velocity.
pub const TERSE_VELOCITY: Domain = Domain::new(-128.0, 128.0);
/// Terse acceleration and angular velocity.
pub const TERSE_ACCELERATION: Domain = Domain::new(-64.0, 64.0);

/// Motion layouts of the full-update object data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionLayout {
    CollisionFull,
    Full,
    CollisionQuantized16,
    Quantized16,
    Quantized8,
}

impl MotionLayout {
    /// Picks the layout for a payload length.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            76 => Some(Self::CollisionFull),
            60 => Some(Self::Full),
            48 => Some(Self::CollisionQuantized16),
            32 => Some(Self::Quantized16),
            16 => Some(Self::Quantized8),
            _ => None,
        }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::CollisionFull => 76,
            Self::Full => 60,
            Self::CollisionQuantized16 => 48,
            Self::Quantized16 => 32,
            Self::Quantized8 => 16,
        }
    }

    #[must_use]
    pub const fn has_collision_plane(self) -> bool {
        matches!(self, Self::CollisionFull | Self::CollisionQuantized16)
    }
}

/// Motion state carried by an object update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionData {
    /// Foot collision plane, sent for avatars.
    pub collision_plane: Option<Vec4>,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
}

impl MotionData {
    /// Decodes motion data, choosing the layout from its length.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MotionDataLength`] for a length no layout uses.
    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        let layout =
            MotionLayout::from_len(data.len()).ok_or(CodecError::MotionDataLength { len: data.len() })?;
        let mut reader = ByteReader::new(data);
        let collision_plane = if layout.has_collision_plane() {
            Some(reader.read_vec4()?)
        } else {
            None
        };

        let mut motion = match layout {
            MotionLayout::CollisionFull | MotionLayout::Full => Self {
                position: reader.read_vec3()?,
                velocity: reader.read_vec3()?,
                acceleration: reader.read_vec3()?,
                rotation: reader.read_packed_quat()?,
                angular_velocity: reader.read_vec3()?,
                ..Self::default()
            },
            MotionLayout::CollisionQuantized16 | MotionLayout::Quantized16 => Self {
                position: Vec3::new(
                    POSITION_XY_16.read_u16(&mut reader)?,
                    POSITION_XY_16.read_u16(&mut reader)?,
                    POSITION_Z_16.read_u16(&mut reader)?,
                ),
                velocity: read_vec3_u16(&mut reader, MOTION_WIDE)?,
                acceleration: read_vec3_u16(&mut reader, MOTION_WIDE)?,
                rotation: read_quat_u16(&mut reader)?,
                angular_velocity: read_vec3_u16(&mut reader, MOTION_WIDE)?,
                ..Self::default()
            },
            MotionLayout::Quantized8 => Self {
                position: read_vec3_u8(&mut reader, MOTION_WIDE)?,
                velocity: read_vec3_u8(&mut reader, MOTION_WIDE)?,
                acceleration: read_vec3_u8(&mut reader, MOTION_WIDE)?,
                rotation: Quat::from_xyzw(
                    ROTATION_COMPONENT.read_u8(&mut reader)?,
                    ROTATION_COMPONENT.read_u8(&mut reader)?,
                    ROTATION_COMPONENT.read_u8(&mut reader)?,
                    ROTATION_COMPONENT.read_u8(&mut reader)?,
                ),
                angular_velocity: read_vec3_u8(&mut reader, MOTION_WIDE)?,
                ..Self::default()
            },
        };
        motion.collision_plane = collision_plane;
        Ok(motion)
    }

    /// Encodes motion data in `layout`. The collision plane is written only
    /// by layouts that carry one, as zeros when absent.
    #[must_use]
    pub fn encode(&self, layout: MotionLayout) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(layout.len());
        if layout.has_collision_plane() {
            writer.write_vec4(self.collision_plane.unwrap_or(Vec4::ZERO));
        }
        match layout {
            MotionLayout::CollisionFull | MotionLayout::Full => {
                writer.write_vec3(self.position);
                writer.write_vec3(self.velocity);
                writer.write_vec3(self.acceleration);
                writer.write_packed_quat(self.rotation);
                writer.write_vec3(self.angular_velocity);
            }
            MotionLayout::CollisionQuantized16 | MotionLayout::Quantized16 => {
                let p = self.position;
                for (v, d) in [(p.x, POSITION_XY_16), (p.y, POSITION_XY_16), (p.z, POSITION_Z_16)] {
                    writer.write_u16(float_to_u16(v, d.lower, d.upper));
                }
                write_vec3_u16(&mut writer, self.velocity, MOTION_WIDE);
                write_vec3_u16(&mut writer, self.acceleration, MOTION_WIDE);
                for c in self.rotation.to_array() {
                    writer.write_u16(float_to_u16(c, -1.0, 1.0));
                }
                write_vec3_u16(&mut writer, self.angular_velocity, MOTION_WIDE);
            }
            MotionLayout::Quantized8 => {
                for v in [self.position, self.velocity, self.acceleration] {
                    write_vec3_u8(&mut writer, v, MOTION_WIDE);
                }
                for c in self.rotation.to_array() {
                    writer.write_u8(float_to_u8(c, -1.0, 1.0));
                }
                write_vec3_u8(&mut writer, self.angular_velocity, MOTION_WIDE);
            }
        }
        writer.finish()
    }
}

fn read_vec3_u16(reader: &mut ByteReader<'_>, domain: Domain) -> CodecResult<Vec3> {
    Ok(Vec3::new(
        domain.read_u16(reader)?,
        domain.read_u16(reader)?,
        domain.read_u16(reader)?,
    ))
}

fn read_vec3_u8(reader: &mut ByteReader<'_>, domain: Domain) -> CodecResult<Vec3> {
    Ok(Vec3::new(
        domain.read_u8(reader)?,
        domain.read_u8(reader)?,
        domain.read_u8(reader)?,
    ))
}

fn read_quat_u16(reader: &mut ByteReader<'_>) -> CodecResult<Quat> {
    Ok(Quat::from_xyzw(
        ROTATION_COMPONENT.read_u16(reader)?,
        ROTATION_COMPONENT.read_u16(reader)?,
        ROTATION_COMPONENT.read_u16(reader)?,
        ROTATION_COMPONENT.read_u16(reader)?,
    ))
}

fn write_vec3_u16(writer: &mut ByteWriter, v: Vec3, domain: Domain) {
    for c in v.to_array() {
        writer.write_u16(float_to_u16(c, domain.lower, domain.upper));
    }
}

fn write_vec3_u8(writer: &mut ByteWriter, v: Vec3, domain: Domain) {
    for c in v.to_array() {
        writer.write_u8(float_to_u8(c, domain.lower, domain.upper));
    }
}

/// Motion state of one object after decoding any update kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMovementUpdate {
    pub local_id: u32,
    pub state: u8,
    pub avatar: bool,
    pub collision_plane: Option<Vec4>,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
    /// Texture entry, when the update carried one.
    pub texture_entry: Option<TextureEntry>,
}

impl ObjectMovementUpdate {
    pub(crate) fn from_motion(local_id: u32, state: u8, avatar: bool, motion: MotionData) -> Self {
        Self {
            local_id,
            state,
            avatar,
            collision_plane: motion.collision_plane,
            position: motion.position,
            velocity: motion.velocity,
            acceleration: motion.acceleration,
            rotation: motion.rotation,
            angular_velocity: motion.angular_velocity,
            texture_entry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths() {
        for layout in [
            MotionLayout::CollisionFull,
            MotionLayout::Full,
            MotionLayout::CollisionQuantized16,
            MotionLayout::Quantized16,
            MotionLayout::Quantized8,
        ] {
            assert_eq!(MotionLayout::from_len(layout.len()), Some(layout));
        }
        assert_eq!(MotionLayout::from_len(44), None);
    }

    #[test]
    fn unsupported_length_is_error() {
        assert_eq!(
            MotionData::decode(&[0u8; 20]),
            Err(CodecError::MotionDataLength { len: 20 })
        );
        assert!(MotionData::decode(&[]).is_err());
    }

    #[test]
    fn zero_code_snaps_to_rest() {
        let motion = MotionData {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::IDENTITY,
            ..MotionData::default()
        };
        let decoded = MotionData::decode(&motion.encode(MotionLayout::Quantized16)).unwrap();
        assert_eq!(decoded.velocity, Vec3::ZERO);
        assert_eq!(decoded.acceleration, Vec3::ZERO);
        assert_eq!(decoded.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn collision_plane_only_in_collision_layouts() {
        let motion = MotionData {
            collision_plane: Some(Vec4::new(0.0, 0.0, 1.0, 22.5)),
            rotation: Quat::IDENTITY,
            ..MotionData::default()
        };
        let with = MotionData::decode(&motion.encode(MotionLayout::CollisionFull)).unwrap();
        assert_eq!(with.collision_plane, motion.collision_plane);
        let without = MotionData::decode(&motion.encode(MotionLayout::Full)).unwrap();
        assert_eq!(without.collision_plane, None);
    }
}
