//! Per-simulator object tables.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;
use wire::{JointType, ObjectPropertiesBlock, ObjectPropertiesFamilyBlock, RegionHandle};

use codec::{DecodedObject, ObjectMovementUpdate};

use crate::object::{Tracked, TrackedAvatar, TrackedPrimitive};
use crate::properties::ObjectProperties;

/// How [`SimulatorObjectTables::get_or_create_avatar`] found its avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvatarLookup {
    pub created: bool,
    /// Local id the avatar was known under before this update, when it was
    /// found by full id under a different local id.
    pub previous_local_id: Option<u32>,
}

/// An avatar sat down, stood up or moved to another seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatChange {
    pub avatar_local_id: u32,
    pub previous: u32,
    pub current: u32,
}

/// Result of applying a full or compressed update.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectChange {
    Primitive {
        primitive: Box<TrackedPrimitive>,
        created: bool,
    },
    Avatar {
        avatar: Box<TrackedAvatar>,
        lookup: AvatarLookup,
        seat_change: Option<SeatChange>,
    },
}

/// Result of a kill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KillOutcome {
    /// Ids named by the kill message.
    pub named: Vec<u32>,
    /// Named ids plus every descendant, ascending.
    pub removed: Vec<u32>,
    /// Avatars left standing because their seat was removed.
    pub unseated: Vec<SeatChange>,
}

/// Properties after a merge, with the local id of the object they were
/// stored on when it is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesUpdate {
    pub local_id: Option<u32>,
    pub properties: ObjectProperties,
}

#[derive(Debug, Clone)]
struct Table<T> {
    by_local: BTreeMap<u32, T>,
    by_full: HashMap<Uuid, u32>,
}

impl<T: Tracked> Table<T> {
    fn new() -> Self {
        Self {
            by_local: BTreeMap::new(),
            by_full: HashMap::new(),
        }
    }

    /// Looks up by local id, then by full id, then creates. The object is
    /// always rebound to `local_id` and, when not nil, `full_id`.
    fn get_or_create(
        &mut self,
        local_id: u32,
        full_id: Uuid,
        region_handle: RegionHandle,
    ) -> (&mut T, Option<u32>, bool) {
        let relocated = if self.by_local.contains_key(&local_id) {
            None
        } else {
            self.take_by_full_id(full_id)
        };
        let previous_local_id = relocated.as_ref().map(|(old, _)| *old);

        let mut created = false;
        let object = match self.by_local.entry(local_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(match relocated {
                Some((_, object)) => object,
                None => {
                    created = true;
                    T::new(local_id, full_id, region_handle)
                }
            }),
        };

        let old_full = object.full_id();
        object.rebind(local_id, full_id);
        if !full_id.is_nil() {
            if old_full != full_id && self.by_full.get(&old_full) == Some(&local_id) {
                self.by_full.remove(&old_full);
            }
            self.by_full.insert(full_id, local_id);
        }
        (object, previous_local_id, created)
    }

    fn take_by_full_id(&mut self, full_id: Uuid) -> Option<(u32, T)> {
        if full_id.is_nil() {
            return None;
        }
        let old = self.by_full.remove(&full_id)?;
        self.by_local.remove(&old).map(|object| (old, object))
    }

    fn remove(&mut self, local_id: u32) -> Option<T> {
        let object = self.by_local.remove(&local_id)?;
        if self.by_full.get(&object.full_id()) == Some(&local_id) {
            self.by_full.remove(&object.full_id());
        }
        Some(object)
    }

    fn get(&self, local_id: u32) -> Option<&T> {
        self.by_local.get(&local_id)
    }

    fn get_mut(&mut self, local_id: u32) -> Option<&mut T> {
        self.by_local.get_mut(&local_id)
    }

    fn local_id_of(&self, full_id: Uuid) -> Option<u32> {
        self.by_full
            .get(&full_id)
            .copied()
            .filter(|id| self.by_local.contains_key(id))
    }

    fn clear(&mut self) {
        self.by_local.clear();
        self.by_full.clear();
    }
}

/// The primitives and avatars one simulator has told us about.
///
/// Both maps are keyed by the simulator-scoped local id; a secondary index
/// finds objects by their stable full id so a reused local id never splits
/// one logical object in two.
#[derive(Debug, Clone)]
pub struct SimulatorObjectTables {
    region_handle: RegionHandle,
    primitives: Table<TrackedPrimitive>,
    avatars: Table<TrackedAvatar>,
}

impl SimulatorObjectTables {
    #[must_use]
    pub fn new(region_handle: RegionHandle) -> Self {
        Self {
            region_handle,
            primitives: Table::new(),
            avatars: Table::new(),
        }
    }

    #[must_use]
    pub const fn region_handle(&self) -> RegionHandle {
        self.region_handle
    }

    /// Returns the primitive for `local_id`, found by local id, then full
    /// id, then created. The flag is `true` for a new primitive.
    pub fn get_or_create_primitive(
        &mut self,
        local_id: u32,
        full_id: Uuid,
    ) -> (&mut TrackedPrimitive, bool) {
        let (primitive, _, created) =
            self.primitives
                .get_or_create(local_id, full_id, self.region_handle);
        (primitive, created)
    }

    /// Returns the avatar for `local_id`, found by local id, then full id,
    /// then created.
    pub fn get_or_create_avatar(
        &mut self,
        local_id: u32,
        full_id: Uuid,
    ) -> (&mut TrackedAvatar, AvatarLookup) {
        let (avatar, previous_local_id, created) =
            self.avatars.get_or_create(local_id, full_id, self.region_handle);
        (
            avatar,
            AvatarLookup {
                created,
                previous_local_id,
            },
        )
    }

    #[must_use]
    pub fn primitive(&self, local_id: u32) -> Option<&TrackedPrimitive> {
        self.primitives.get(local_id)
    }

    #[must_use]
    pub fn primitive_by_full_id(&self, full_id: Uuid) -> Option<&TrackedPrimitive> {
        self.primitives
            .local_id_of(full_id)
            .and_then(|id| self.primitives.get(id))
    }

    #[must_use]
    pub fn avatar(&self, local_id: u32) -> Option<&TrackedAvatar> {
        self.avatars.get(local_id)
    }

    #[must_use]
    pub fn avatar_by_full_id(&self, full_id: Uuid) -> Option<&TrackedAvatar> {
        self.avatars
            .local_id_of(full_id)
            .and_then(|id| self.avatars.get(id))
    }

    /// Primitives in ascending local-id order.
    pub fn primitives(&self) -> impl Iterator<Item = &TrackedPrimitive> {
        self.primitives.by_local.values()
    }

    pub fn avatars(&self) -> impl Iterator<Item = &TrackedAvatar> {
        self.avatars.by_local.values()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitives.by_local.len()
    }

    #[must_use]
    pub fn avatar_count(&self) -> usize {
        self.avatars.by_local.len()
    }

    /// Applies a full or compressed update and returns a copy of the result.
    pub fn apply_object(&mut self, object: &DecodedObject) -> ObjectChange {
        let local_id = object.local_id();
        if object.is_avatar() {
            let (avatar, lookup) = self.get_or_create_avatar(local_id, object.full_id);
            let seat_change = avatar
                .apply_decoded(object)
                .map(|previous| SeatChange {
                    avatar_local_id: local_id,
                    previous,
                    current: avatar.sitting_on,
                });
            ObjectChange::Avatar {
                avatar: Box::new(avatar.clone()),
                lookup,
                seat_change,
            }
        } else {
            let (primitive, created) = self.get_or_create_primitive(local_id, object.full_id);
            primitive.apply_decoded(object);
            ObjectChange::Primitive {
                primitive: Box::new(primitive.clone()),
                created,
            }
        }
    }

    /// Applies a terse update, creating the avatar or primitive when the
    /// local id is unseen. Terse updates carry no full id, so a created
    /// object stays unindexed until a full update names it. Returns `true`
    /// for a new object.
    pub fn apply_movement(&mut self, update: &ObjectMovementUpdate) -> bool {
        let (local_id, region_handle) = (update.local_id, self.region_handle);
        if update.avatar {
            let (avatar, _, created) =
                self.avatars.get_or_create(local_id, Uuid::nil(), region_handle);
            avatar.apply_movement(update);
            created
        } else {
            let (primitive, _, created) =
                self.primitives
                    .get_or_create(local_id, Uuid::nil(), region_handle);
            primitive.apply_movement(update);
            created
        }
    }

    /// Removes the named objects and, transitively, every primitive linked
    /// to or worn by one of them.
    pub fn apply_kill(&mut self, local_ids: &[u32]) -> KillOutcome {
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for primitive in self.primitives.by_local.values() {
            if primitive.parent_id != 0 {
                children
                    .entry(primitive.parent_id)
                    .or_default()
                    .push(primitive.local_id);
            }
        }

        let mut removed: BTreeSet<u32> = local_ids.iter().copied().collect();
        let mut frontier: Vec<u32> = removed.iter().copied().collect();
        while let Some(parent) = frontier.pop() {
            for &child in children.get(&parent).into_iter().flatten() {
                if removed.insert(child) {
                    frontier.push(child);
                }
            }
        }

        for &id in &removed {
            self.primitives.remove(id);
            self.avatars.remove(id);
        }

        let mut unseated = Vec::new();
        for avatar in self.avatars.by_local.values_mut() {
            if avatar.sitting_on != 0 && removed.contains(&avatar.sitting_on) {
                unseated.push(SeatChange {
                    avatar_local_id: avatar.local_id,
                    previous: avatar.sitting_on,
                    current: 0,
                });
                avatar.sitting_on = 0;
            }
        }

        KillOutcome {
            named: local_ids.to_vec(),
            removed: removed.into_iter().collect(),
            unseated,
        }
    }

    /// Stores a full property record on the matching primitive.
    pub fn apply_properties(&mut self, block: &ObjectPropertiesBlock) -> PropertiesUpdate {
        let properties = ObjectProperties::from_block(block);
        let local_id = self.primitives.local_id_of(block.object_id);
        if let Some(primitive) = local_id.and_then(|id| self.primitives.get_mut(id)) {
            primitive.properties = Some(properties.clone());
        }
        PropertiesUpdate {
            local_id,
            properties,
        }
    }

    /// Merges a family reply, creating the record when the primitive has
    /// none yet.
    pub fn apply_family_properties(
        &mut self,
        block: &ObjectPropertiesFamilyBlock,
    ) -> PropertiesUpdate {
        let local_id = self.primitives.local_id_of(block.object_id);
        let properties = match local_id.and_then(|id| self.primitives.get_mut(id)) {
            Some(primitive) => {
                let record = primitive.properties.get_or_insert_with(ObjectProperties::default);
                record.merge_family(block);
                record.clone()
            }
            None => {
                let mut record = ObjectProperties::default();
                record.merge_family(block);
                record
            }
        };
        PropertiesUpdate {
            local_id,
            properties,
        }
    }

    /// Dead-reckons every object forward by `dt` seconds of simulator time,
    /// avatars first. Returns the number of objects that moved.
    pub fn interpolate(&mut self, dt: f32) -> usize {
        let mut moved = 0;
        for avatar in self.avatars.by_local.values_mut() {
            moved += usize::from(avatar.motion.advance_linear(dt));
        }
        for primitive in self.primitives.by_local.values_mut() {
            let mut changed = primitive.motion.advance_linear(dt);
            match primitive.joint.joint_type {
                JointType::Invalid => changed |= primitive.motion.advance_angular(dt),
                JointType::Hinge | JointType::Point | JointType::Unknown(_) => {}
            }
            moved += usize::from(changed);
        }
        moved
    }

    /// Drops every tracked object.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.avatars.clear();
    }
}
