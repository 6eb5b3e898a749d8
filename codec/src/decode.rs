//! Decoders for the three object-update block kinds.

use bitstream::quantize::{float_to_u16, u16_to_float};
use bitstream::{ByteReader, ByteWriter};
use glam::{Quat, Vec3};
use texture::{Color4, TextureEntry};
use wire::{
    CompressedBlock, CompressedFlags, DecodeLimits, JointType, LimitKind, ObjectUpdateBlock,
    PCode, PackedShape, PrimFlags, ReadExt, TerseBlock, WriteExt,
};

use crate::construction::ConstructionData;
use crate::error::{check_limit, CodecError, CodecResult};
use crate::extra_params::ExtraParams;
use crate::motion::{
    Domain, MotionData, ObjectMovementUpdate, ROTATION_COMPONENT, TERSE_ACCELERATION,
    TERSE_VELOCITY,
};
use crate::name_value::NameValues;
use crate::object::{
    text_field, DecodedObject, JointInfo, ParticleBlock, SoundInfo, TextureAnimation,
    PARTICLE_BLOCK_SIZE,
};

/// Terse block length without a collision plane.
pub const TERSE_LEN: usize = 44;
/// Terse block length for avatars, which carry a collision plane.
pub const TERSE_AVATAR_LEN: usize = 60;
/// Bytes before the `avatar` flag settles which terse length applies.
const TERSE_HEADER_LEN: usize = 6;
/// Length prefix in front of a terse texture entry.
const TERSE_TE_PREFIX: usize = 4;

fn decode_texture_entry(raw: &[u8], limits: &DecodeLimits) -> CodecResult<Option<TextureEntry>> {
    if raw.is_empty() {
        return Ok(None);
    }
    check_limit(
        LimitKind::TextureEntryBytes,
        limits.max_texture_entry_bytes,
        raw.len(),
    )?;
    Ok(Some(TextureEntry::from_bytes(raw)?))
}

fn decode_text(raw: &[u8], limits: &DecodeLimits) -> CodecResult<String> {
    check_limit(LimitKind::TextBytes, limits.max_text_bytes, raw.len())?;
    Ok(text_field(raw))
}

fn is_tree(pcode: PCode) -> bool {
    matches!(pcode, PCode::Tree | PCode::NewTree | PCode::Grass)
}

/// Decodes one block of a full `ObjectUpdate`.
///
/// # Errors
///
/// Fails on an unsupported motion-data length, a malformed texture entry or
/// extra-params block, or a field over `limits`.
pub fn decode_object_block(
    block: &ObjectUpdateBlock,
    limits: &DecodeLimits,
) -> CodecResult<DecodedObject> {
    let pcode = PCode::from_raw(block.pcode);
    let name_values = NameValues::parse(&block.name_value, limits)?;
    let motion = MotionData::decode(&block.object_data)?;

    let mut movement =
        ObjectMovementUpdate::from_motion(block.local_id, block.state, pcode == PCode::Avatar, motion);
    movement.texture_entry = decode_texture_entry(&block.texture_entry, limits)?;

    let (tree_species, scratch_pad) = match block.data.first() {
        Some(&species) if is_tree(pcode) => (Some(species), Vec::new()),
        _ => (None, block.data.clone()),
    };
    let media_url = decode_text(&block.media_url, limits)?;

    Ok(DecodedObject {
        movement,
        full_id: block.full_id,
        owner_id: block.owner_id,
        parent_id: block.parent_id,
        pcode,
        crc: block.crc,
        click_action: block.click_action,
        scale: block.scale,
        flags: PrimFlags::from_raw(block.update_flags),
        construction: ConstructionData::unpack(&block.shape, pcode, block.material, block.state),
        attachment: name_values.is_attachment(),
        name_values,
        extra_params: ExtraParams::parse(&block.extra_params, limits)?,
        texture_anim: TextureAnimation::from_field(&block.texture_anim),
        text: decode_text(&block.text, limits)?,
        text_color: Color4::from_bytes(block.text_color),
        media_url: (!media_url.is_empty()).then_some(media_url),
        particles: (!block.ps_block.is_empty()).then(|| ParticleBlock::new(block.ps_block.clone())),
        sound: (!block.sound.is_nil()).then_some(SoundInfo {
            sound_id: block.sound,
            gain: block.gain,
            flags: block.sound_flags,
            radius: block.radius,
        }),
        tree_species,
        scratch_pad,
        joint: JointInfo {
            joint_type: JointType::from_raw(block.joint_type),
            pivot: block.joint_pivot,
            axis_or_anchor: block.joint_axis_or_anchor,
        },
    })
}

fn read_terse_vec3(reader: &mut ByteReader<'_>, domain: Domain) -> CodecResult<Vec3> {
    let mut v = [0.0; 3];
    for c in &mut v {
        *c = u16_to_float(reader.read_u16()?, domain.lower, domain.upper);
    }
    Ok(Vec3::from_array(v))
}

/// Decodes one block of an `ImprovedTerseObjectUpdate`.
///
/// # Errors
///
/// Fails when the block is shorter than its layout or its texture entry is
/// malformed.
pub fn decode_terse_block(
    block: &TerseBlock,
    limits: &DecodeLimits,
) -> CodecResult<ObjectMovementUpdate> {
    let data = &block.data;
    if data.len() < TERSE_HEADER_LEN {
        return Err(CodecError::TerseDataLength {
            expected: TERSE_LEN,
            actual: data.len(),
        });
    }
    let mut reader = ByteReader::new(data);
    let local_id = reader.read_u32()?;
    let state = reader.read_u8()?;
    let avatar = reader.read_u8()? != 0;

    let expected = if avatar { TERSE_AVATAR_LEN } else { TERSE_LEN };
    if data.len() < expected {
        return Err(CodecError::TerseDataLength {
            expected,
            actual: data.len(),
        });
    }

    let collision_plane = if avatar {
        Some(reader.read_vec4()?)
    } else {
        None
    };
    let position = reader.read_vec3()?;
    let velocity = read_terse_vec3(&mut reader, TERSE_VELOCITY)?;
    let acceleration = read_terse_vec3(&mut reader, TERSE_ACCELERATION)?;
    let mut rotation = [0.0; 4];
    for c in &mut rotation {
        *c = u16_to_float(reader.read_u16()?, ROTATION_COMPONENT.lower, ROTATION_COMPONENT.upper);
    }
    let angular_velocity = read_terse_vec3(&mut reader, TERSE_ACCELERATION)?;

    let texture_entry = if block.texture_entry.len() > TERSE_TE_PREFIX {
        decode_texture_entry(&block.texture_entry[TERSE_TE_PREFIX..], limits)?
    } else {
        None
    };

    Ok(ObjectMovementUpdate {
        local_id,
        state,
        avatar,
        collision_plane,
        position,
        velocity,
        acceleration,
        rotation: Quat::from_array(rotation),
        angular_velocity,
        texture_entry,
    })
}

/// Encodes a movement update as a terse block.
#[must_use]
pub fn encode_terse_block(update: &ObjectMovementUpdate) -> TerseBlock {
    let avatar = update.avatar;
    let mut writer = ByteWriter::with_capacity(TERSE_AVATAR_LEN);
    writer.write_u32(update.local_id);
    writer.write_u8(update.state);
    writer.write_u8(u8::from(avatar));
    if avatar {
        writer.write_vec4(update.collision_plane.unwrap_or_default());
    }
    writer.write_vec3(update.position);
    let groups = [
        (update.velocity, TERSE_VELOCITY),
        (update.acceleration, TERSE_ACCELERATION),
    ];
    for (v, d) in groups {
        for c in v.to_array() {
            writer.write_u16(float_to_u16(c, d.lower, d.upper));
        }
    }
    for c in update.rotation.to_array() {
        writer.write_u16(float_to_u16(c, -1.0, 1.0));
    }
    for c in update.angular_velocity.to_array() {
        let d = TERSE_ACCELERATION;
        writer.write_u16(float_to_u16(c, d.lower, d.upper));
    }

    let texture_entry = update
        .texture_entry
        .as_ref()
        .map(|te| {
            let bytes = te.to_bytes();
            let mut out = ByteWriter::with_capacity(bytes.len() + TERSE_TE_PREFIX);
            out.write_u32(bytes.len() as u32);
            out.write_bytes(&bytes);
            out.finish()
        })
        .unwrap_or_default();

    TerseBlock {
        data: writer.finish(),
        texture_entry,
    }
}

/// Decodes one block of an `ObjectUpdateCompressed`.
///
/// # Errors
///
/// Fails when the block is truncated before its texture entry, a length
/// prefix overruns the block, or a field exceeds `limits`.
pub fn decode_compressed_block(
    block: &CompressedBlock,
    limits: &DecodeLimits,
) -> CodecResult<DecodedObject> {
    let mut r = ByteReader::new(&block.data);

    let full_id = r.read_uuid()?;
    let local_id = r.read_u32()?;
    let pcode = PCode::from_raw(r.read_u8()?);
    let state = r.read_u8()?;
    let crc = r.read_u32()?;
    let material = r.read_u8()?;
    let click_action = r.read_u8()?;
    let scale = r.read_vec3()?;
    let position = r.read_vec3()?;
    let rotation = r.read_packed_quat()?;
    let flags = CompressedFlags::from_raw(r.read_u32()?);
    let owner_id = r.read_uuid()?;

    let angular_velocity = if flags.contains(CompressedFlags::HAS_ANGULAR_VELOCITY) {
        r.read_vec3()?
    } else {
        Vec3::ZERO
    };
    let parent_id = if flags.contains(CompressedFlags::HAS_PARENT) {
        r.read_u32()?
    } else {
        0
    };

    let mut tree_species = None;
    let mut scratch_pad = Vec::new();
    if flags.contains(CompressedFlags::TREE) {
        tree_species = Some(r.read_u8()?);
    } else if flags.contains(CompressedFlags::SCRATCH_PAD) {
        let size = usize::from(r.read_u8()?);
        scratch_pad = r.read_bytes(size)?.to_vec();
    }

    let mut text = String::new();
    let mut text_color = Color4::new(0.0, 0.0, 0.0, 0.0);
    if flags.contains(CompressedFlags::HAS_TEXT) {
        text = decode_text(r.read_cstr()?, limits)?;
        text_color = Color4::from_bytes(r.read_array::<4>()?);
    }

    let media_url = if flags.contains(CompressedFlags::MEDIA_URL) {
        Some(decode_text(r.read_cstr()?, limits)?)
    } else {
        None
    };

    let particles = if flags.contains(CompressedFlags::HAS_PARTICLES) {
        Some(ParticleBlock::new(r.read_bytes(PARTICLE_BLOCK_SIZE)?.to_vec()))
    } else {
        None
    };

    let extra_params = ExtraParams::read(&mut r, limits)?;

    let sound = if flags.contains(CompressedFlags::HAS_SOUND) {
        Some(SoundInfo {
            sound_id: r.read_uuid()?,
            gain: r.read_f32()?,
            flags: r.read_u8()?,
            radius: r.read_f32()?,
        })
    } else {
        None
    };

    let name_values = if flags.contains(CompressedFlags::HAS_NAME_VALUES) {
        NameValues::parse(r.read_cstr()?, limits)?
    } else {
        NameValues::default()
    };

    let shape = if r.remaining() >= PackedShape::SIZE {
        PackedShape::read(&mut r)?
    } else {
        PackedShape::default()
    };

    let mut texture_entry = None;
    if r.remaining() >= 4 {
        let len = r.read_u32()? as usize;
        if len > r.remaining() {
            return Err(CodecError::LengthPrefix {
                field: "texture entry",
                declared: len,
                available: r.remaining(),
            });
        }
        texture_entry = decode_texture_entry(r.read_bytes(len)?, limits)?;
    }

    let mut texture_anim = None;
    if flags.contains(CompressedFlags::TEXTURE_ANIMATION) && r.remaining() >= 4 {
        let len = r.read_u32()? as usize;
        if len >= TextureAnimation::SIZE && r.remaining() >= TextureAnimation::SIZE {
            texture_anim = Some(TextureAnimation::read(&mut r)?);
        }
    }

    let movement = ObjectMovementUpdate {
        local_id,
        state,
        avatar: pcode == PCode::Avatar,
        collision_plane: None,
        position,
        velocity: Vec3::ZERO,
        acceleration: Vec3::ZERO,
        rotation,
        angular_velocity,
        texture_entry,
    };

    Ok(DecodedObject {
        movement,
        full_id,
        owner_id,
        parent_id,
        pcode,
        crc,
        click_action,
        scale,
        flags: PrimFlags::from_raw(block.update_flags),
        construction: ConstructionData::unpack(&shape, pcode, material, state),
        attachment: name_values.is_attachment(),
        name_values,
        extra_params,
        texture_anim,
        text,
        text_color,
        media_url,
        particles,
        sound,
        tree_species,
        scratch_pad,
        joint: JointInfo::default(),
    })
}
