//! Message blocks exchanged with a simulator.
//!
//! The message-template framing layer (outside this crate) turns datagrams
//! into these structures. Variable-layout payloads such as packed motion
//! data, texture entries and compressed object data stay as raw bytes; the
//! `codec` crate decodes them.

use bitstream::{ByteReader, ByteResult, ByteWriter};
use glam::Vec3;
use uuid::Uuid;

use crate::kinds::WearableType;

/// Region handle: global grid coordinates packed into 64 bits.
pub type RegionHandle = u64;

/// Scale applied to the 16-bit time dilation field.
pub const TIME_DILATION_SCALE: f32 = 65535.0;

/// Region header shared by every object-update message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionData {
    pub region_handle: RegionHandle,
    /// Time dilation as `dilation * 65535`.
    pub time_dilation: u16,
}

impl RegionData {
    /// Returns the time dilation as a factor in `[0, 1]`.
    #[must_use]
    pub fn dilation(self) -> f32 {
        f32::from(self.time_dilation) / TIME_DILATION_SCALE
    }
}

/// A decoded inbound message, matched exhaustively at the dispatch boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    ObjectUpdate(ObjectUpdateMessage),
    ImprovedTerseObjectUpdate(TerseObjectUpdateMessage),
    ObjectUpdateCompressed(CompressedObjectUpdateMessage),
    KillObject(KillObjectMessage),
    ObjectProperties(ObjectPropertiesMessage),
    ObjectPropertiesFamily(ObjectPropertiesFamilyMessage),
    AgentWearablesUpdate(AgentWearablesUpdateMessage),
    AgentCachedTextureResponse(AgentCachedTextureResponseMessage),
}

impl InboundMessage {
    /// Template name of the message, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ObjectUpdate(_) => "ObjectUpdate",
            Self::ImprovedTerseObjectUpdate(_) => "ImprovedTerseObjectUpdate",
            Self::ObjectUpdateCompressed(_) => "ObjectUpdateCompressed",
            Self::KillObject(_) => "KillObject",
            Self::ObjectProperties(_) => "ObjectProperties",
            Self::ObjectPropertiesFamily(_) => "ObjectPropertiesFamily",
            Self::AgentWearablesUpdate(_) => "AgentWearablesUpdate",
            Self::AgentCachedTextureResponse(_) => "AgentCachedTextureResponse",
        }
    }
}

/// Full `ObjectUpdate` message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectUpdateMessage {
    pub region: RegionData,
    pub objects: Vec<ObjectUpdateBlock>,
}

/// One object of a full update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectUpdateBlock {
    pub local_id: u32,
    pub state: u8,
    pub full_id: Uuid,
    pub crc: u32,
    pub pcode: u8,
    pub material: u8,
    pub click_action: u8,
    pub scale: Vec3,
    /// Packed motion data; the layout is selected by its length.
    pub object_data: Vec<u8>,
    pub parent_id: u32,
    pub update_flags: u32,
    pub shape: PackedShape,
    pub texture_entry: Vec<u8>,
    pub texture_anim: Vec<u8>,
    /// Newline separated name-value lines.
    pub name_value: Vec<u8>,
    pub data: Vec<u8>,
    pub text: Vec<u8>,
    pub text_color: [u8; 4],
    pub media_url: Vec<u8>,
    pub ps_block: Vec<u8>,
    pub extra_params: Vec<u8>,
    pub sound: Uuid,
    pub owner_id: Uuid,
    pub gain: f32,
    pub sound_flags: u8,
    pub radius: f32,
    pub joint_type: u8,
    pub joint_pivot: Vec3,
    pub joint_axis_or_anchor: Vec3,
}

/// Path and profile parameters in their packed wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedShape {
    pub path_curve: u8,
    pub path_begin: u16,
    pub path_end: u16,
    pub path_scale_x: u8,
    pub path_scale_y: u8,
    pub path_shear_x: u8,
    pub path_shear_y: u8,
    pub path_twist: i8,
    pub path_twist_begin: i8,
    pub path_radius_offset: i8,
    pub path_taper_x: i8,
    pub path_taper_y: i8,
    pub path_revolutions: u8,
    pub path_skew: i8,
    pub profile_curve: u8,
    pub profile_begin: u16,
    pub profile_end: u16,
    pub profile_hollow: u16,
}

impl PackedShape {
    /// Encoded size in bytes.
    pub const SIZE: usize = 23;

    /// Reads the shape in compressed-update field order.
    pub fn read(reader: &mut ByteReader<'_>) -> ByteResult<Self> {
        Ok(Self {
            path_curve: reader.read_u8()?,
            path_begin: reader.read_u16()?,
            path_end: reader.read_u16()?,
            path_scale_x: reader.read_u8()?,
            path_scale_y: reader.read_u8()?,
            path_shear_x: reader.read_u8()?,
            path_shear_y: reader.read_u8()?,
            path_twist: reader.read_i8()?,
            path_twist_begin: reader.read_i8()?,
            path_radius_offset: reader.read_i8()?,
            path_taper_x: reader.read_i8()?,
            path_taper_y: reader.read_i8()?,
            path_revolutions: reader.read_u8()?,
            path_skew: reader.read_i8()?,
            profile_curve: reader.read_u8()?,
            profile_begin: reader.read_u16()?,
            profile_end: reader.read_u16()?,
            profile_hollow: reader.read_u16()?,
        })
    }

    /// Writes the shape in compressed-update field order.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.path_curve);
        writer.write_u16(self.path_begin);
        writer.write_u16(self.path_end);
        writer.write_u8(self.path_scale_x);
        writer.write_u8(self.path_scale_y);
        writer.write_u8(self.path_shear_x);
        writer.write_u8(self.path_shear_y);
        writer.write_i8(self.path_twist);
        writer.write_i8(self.path_twist_begin);
        writer.write_i8(self.path_radius_offset);
        writer.write_i8(self.path_taper_x);
        writer.write_i8(self.path_taper_y);
        writer.write_u8(self.path_revolutions);
        writer.write_i8(self.path_skew);
        writer.write_u8(self.profile_curve);
        writer.write_u16(self.profile_begin);
        writer.write_u16(self.profile_end);
        writer.write_u16(self.profile_hollow);
    }
}

/// `ImprovedTerseObjectUpdate` message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerseObjectUpdateMessage {
    pub region: RegionData,
    pub objects: Vec<TerseBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerseBlock {
    pub data: Vec<u8>,
    /// Optional texture entry, prefixed by a 4-byte length.
    pub texture_entry: Vec<u8>,
}

/// `ObjectUpdateCompressed` message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedObjectUpdateMessage {
    pub region: RegionData,
    pub objects: Vec<CompressedBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedBlock {
    pub update_flags: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KillObjectMessage {
    pub local_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectPropertiesMessage {
    pub objects: Vec<ObjectPropertiesBlock>,
}

/// Full property record of one object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectPropertiesBlock {
    pub object_id: Uuid,
    pub creator_id: Uuid,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub creation_date: u64,
    pub base_mask: u32,
    pub owner_mask: u32,
    pub group_mask: u32,
    pub everyone_mask: u32,
    pub next_owner_mask: u32,
    pub ownership_cost: i32,
    pub sale_type: u8,
    pub sale_price: i32,
    pub aggregate_perms: u8,
    pub aggregate_perm_textures: u8,
    pub aggregate_perm_textures_owner: u8,
    pub category: u32,
    pub inventory_serial: i16,
    pub item_id: Uuid,
    pub folder_id: Uuid,
    pub from_task_id: Uuid,
    pub last_owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub touch_name: String,
    pub sit_name: String,
    pub texture_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectPropertiesFamilyMessage {
    pub object: ObjectPropertiesFamilyBlock,
}

/// Subset of the property record sent on request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectPropertiesFamilyBlock {
    pub request_flags: u32,
    pub object_id: Uuid,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub base_mask: u32,
    pub owner_mask: u32,
    pub group_mask: u32,
    pub everyone_mask: u32,
    pub next_owner_mask: u32,
    pub ownership_cost: i32,
    pub sale_type: u8,
    pub sale_price: i32,
    pub category: u32,
    pub last_owner_id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentWearablesUpdateMessage {
    pub agent_id: Uuid,
    pub serial_num: u32,
    pub wearables: Vec<WearableBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WearableBlock {
    pub item_id: Uuid,
    pub asset_id: Uuid,
    pub wearable_type: WearableType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentCachedTextureResponseMessage {
    pub agent_id: Uuid,
    pub serial_num: i32,
    pub textures: Vec<CachedTextureBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedTextureBlock {
    pub texture_id: Uuid,
    pub texture_index: u8,
}

/// A message sent to the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    AgentWearablesRequest {
        agent_id: Uuid,
        session_id: Uuid,
    },
    AgentCachedTexture {
        agent_id: Uuid,
        session_id: Uuid,
        serial_num: i32,
        requests: Vec<CachedTextureBlock>,
    },
    AgentIsNowWearing {
        agent_id: Uuid,
        session_id: Uuid,
        wearables: Vec<(Uuid, WearableType)>,
    },
    AgentSetAppearance(AgentSetAppearanceMessage),
}

impl OutboundMessage {
    /// Template name of the message, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AgentWearablesRequest { .. } => "AgentWearablesRequest",
            Self::AgentCachedTexture { .. } => "AgentCachedTexture",
            Self::AgentIsNowWearing { .. } => "AgentIsNowWearing",
            Self::AgentSetAppearance(_) => "AgentSetAppearance",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSetAppearanceMessage {
    pub agent_id: Uuid,
    pub session_id: Uuid,
    pub serial_num: u32,
    pub size: Vec3,
    pub wearable_cache: Vec<CachedTextureBlock>,
    pub texture_entry: Vec<u8>,
    pub visual_params: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilation_scale() {
        let region = RegionData {
            region_handle: 1,
            time_dilation: u16::MAX,
        };
        assert_eq!(region.dilation(), 1.0);
        assert_eq!(RegionData::default().dilation(), 0.0);
    }

    #[test]
    fn packed_shape_roundtrip() {
        let shape = PackedShape {
            path_curve: 16,
            path_begin: 100,
            path_end: 2000,
            path_scale_x: 100,
            path_scale_y: 150,
            path_twist: -20,
            path_revolutions: 1,
            profile_curve: 1,
            profile_hollow: 5000,
            ..PackedShape::default()
        };
        let mut writer = ByteWriter::new();
        shape.write(&mut writer);
        let bytes = writer.finish();
        assert_eq!(bytes.len(), PackedShape::SIZE);
        let back = PackedShape::read(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn message_names() {
        let msg = InboundMessage::KillObject(KillObjectMessage::default());
        assert_eq!(msg.name(), "KillObject");
        let out = OutboundMessage::AgentWearablesRequest {
            agent_id: Uuid::nil(),
            session_id: Uuid::nil(),
        };
        assert_eq!(out.name(), "AgentWearablesRequest");
    }
}
