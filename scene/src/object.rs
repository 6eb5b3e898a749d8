//! Tracked primitives and avatars.

use glam::Vec3;
use texture::{Color4, TextureEntry};
use uuid::Uuid;
use wire::{PCode, PrimFlags, RegionHandle};

use codec::{
    ConstructionData, DecodedObject, ExtraParams, JointInfo, NameValues, ObjectMovementUpdate,
    ParticleBlock, SoundInfo, TextureAnimation,
};

use crate::motion::MotionState;
use crate::properties::ObjectProperties;

/// Ids shared by both kinds of tracked object.
pub(crate) trait Tracked {
    fn new(local_id: u32, full_id: Uuid, region_handle: RegionHandle) -> Self;
    fn full_id(&self) -> Uuid;
    fn rebind(&mut self, local_id: u32, full_id: Uuid);
}

/// A primitive, tree, grass patch or other non-avatar object.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPrimitive {
    pub local_id: u32,
    pub full_id: Uuid,
    pub region_handle: RegionHandle,
    /// Local id of the link parent or wearer, 0 for none.
    pub parent_id: u32,
    pub owner_id: Uuid,
    pub pcode: PCode,
    pub crc: u32,
    pub click_action: u8,
    pub scale: Vec3,
    pub flags: PrimFlags,
    pub motion: MotionState,
    pub construction: ConstructionData,
    pub texture_entry: Option<TextureEntry>,
    pub joint: JointInfo,
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
    pub properties: Option<ObjectProperties>,
}

impl Tracked for TrackedPrimitive {
    fn new(local_id: u32, full_id: Uuid, region_handle: RegionHandle) -> Self {
        Self {
            local_id,
            full_id,
            region_handle,
            parent_id: 0,
            owner_id: Uuid::nil(),
            pcode: PCode::Prim,
            crc: 0,
            click_action: 0,
            scale: Vec3::ONE,
            flags: PrimFlags::default(),
            motion: MotionState::default(),
            construction: ConstructionData::default(),
            texture_entry: None,
            joint: JointInfo::default(),
            name_values: NameValues::default(),
            attachment: false,
            extra_params: ExtraParams::default(),
            texture_anim: None,
            text: String::new(),
            text_color: Color4::new(0.0, 0.0, 0.0, 0.0),
            media_url: None,
            particles: None,
            sound: None,
            tree_species: None,
            scratch_pad: Vec::new(),
            properties: None,
        }
    }

    fn full_id(&self) -> Uuid {
        self.full_id
    }

    fn rebind(&mut self, local_id: u32, full_id: Uuid) {
        self.local_id = local_id;
        if !full_id.is_nil() {
            self.full_id = full_id;
        }
    }
}

impl TrackedPrimitive {
    /// Copies everything a full or compressed update carries.
    pub fn apply_decoded(&mut self, object: &DecodedObject) {
        self.parent_id = object.parent_id;
        self.owner_id = object.owner_id;
        self.pcode = object.pcode;
        self.crc = object.crc;
        self.click_action = object.click_action;
        self.scale = object.scale;
        self.flags = object.flags;
        self.apply_movement(&object.movement);
        self.construction = object.construction;
        self.joint = object.joint;
        self.name_values.clone_from(&object.name_values);
        self.attachment = object.attachment;
        self.extra_params.clone_from(&object.extra_params);
        self.texture_anim = object.texture_anim;
        self.text.clone_from(&object.text);
        self.text_color = object.text_color;
        self.media_url.clone_from(&object.media_url);
        self.particles.clone_from(&object.particles);
        self.sound = object.sound;
        self.tree_species = object.tree_species;
        self.scratch_pad.clone_from(&object.scratch_pad);
    }

    /// Applies motion and, when present, a new texture entry.
    pub fn apply_movement(&mut self, update: &ObjectMovementUpdate) {
        self.motion.apply(update);
        self.construction.state = update.state;
        if update.texture_entry.is_some() {
            self.texture_entry.clone_from(&update.texture_entry);
        }
    }

    /// `true` when the object is worn by an avatar.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.attachment
    }
}

/// An avatar present in the region.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAvatar {
    pub local_id: u32,
    pub full_id: Uuid,
    pub region_handle: RegionHandle,
    /// Local id of the object the avatar sits on, 0 when standing.
    pub sitting_on: u32,
    pub scale: Vec3,
    pub flags: PrimFlags,
    pub motion: MotionState,
    pub name_values: NameValues,
    pub texture_entry: Option<TextureEntry>,
    pub state: u8,
}

impl Tracked for TrackedAvatar {
    fn new(local_id: u32, full_id: Uuid, region_handle: RegionHandle) -> Self {
        Self {
            local_id,
            full_id,
            region_handle,
            sitting_on: 0,
            scale: Vec3::ONE,
            flags: PrimFlags::default(),
            motion: MotionState::default(),
            name_values: NameValues::default(),
            texture_entry: None,
            state: 0,
        }
    }

    fn full_id(&self) -> Uuid {
        self.full_id
    }

    fn rebind(&mut self, local_id: u32, full_id: Uuid) {
        self.local_id = local_id;
        if !full_id.is_nil() {
            self.full_id = full_id;
        }
    }
}

impl TrackedAvatar {
    /// Copies an avatar update. Returns the previous seat when it changed.
    pub fn apply_decoded(&mut self, object: &DecodedObject) -> Option<u32> {
        self.scale = object.scale;
        self.flags = object.flags;
        self.apply_movement(&object.movement);
        if !object.name_values.is_empty() {
            self.name_values.clone_from(&object.name_values);
        }
        let previous = self.sitting_on;
        self.sitting_on = object.parent_id;
        (previous != self.sitting_on).then_some(previous)
    }

    pub fn apply_movement(&mut self, update: &ObjectMovementUpdate) {
        self.motion.apply(update);
        self.state = update.state;
        if update.texture_entry.is_some() {
            self.texture_entry.clone_from(&update.texture_entry);
        }
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.name_values.first_name()
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.name_values.last_name()
    }

    /// `"First Last"`, or an empty string before the names are known.
    #[must_use]
    pub fn name(&self) -> String {
        self.name_values.full_name().unwrap_or_default()
    }
}
