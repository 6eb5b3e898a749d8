//! Object property records.

use uuid::Uuid;
use wire::{ObjectPropertiesBlock, ObjectPropertiesFamilyBlock};

/// Permission masks of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub base: u32,
    pub owner: u32,
    pub group: u32,
    pub everyone: u32,
    pub next_owner: u32,
}

/// Ownership, sale and descriptive properties of one object.
///
/// A full record comes from `ObjectProperties`; `ObjectPropertiesFamily`
/// carries a subset and only overwrites that subset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectProperties {
    pub object_id: Uuid,
    pub creator_id: Uuid,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub last_owner_id: Uuid,
    pub creation_date: u64,
    pub permissions: Permissions,
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
    pub name: String,
    pub description: String,
    pub touch_name: String,
    pub sit_name: String,
    pub texture_ids: Vec<Uuid>,
}

impl ObjectProperties {
    #[must_use]
    pub fn from_block(block: &ObjectPropertiesBlock) -> Self {
        Self {
            object_id: block.object_id,
            creator_id: block.creator_id,
            owner_id: block.owner_id,
            group_id: block.group_id,
            last_owner_id: block.last_owner_id,
            creation_date: block.creation_date,
            permissions: Permissions {
                base: block.base_mask,
                owner: block.owner_mask,
                group: block.group_mask,
                everyone: block.everyone_mask,
                next_owner: block.next_owner_mask,
            },
            ownership_cost: block.ownership_cost,
            sale_type: block.sale_type,
            sale_price: block.sale_price,
            aggregate_perms: block.aggregate_perms,
            aggregate_perm_textures: block.aggregate_perm_textures,
            aggregate_perm_textures_owner: block.aggregate_perm_textures_owner,
            category: block.category,
            inventory_serial: block.inventory_serial,
            item_id: block.item_id,
            folder_id: block.folder_id,
            from_task_id: block.from_task_id,
            name: block.name.clone(),
            description: block.description.clone(),
            touch_name: block.touch_name.clone(),
            sit_name: block.sit_name.clone(),
            texture_ids: block.texture_ids.clone(),
        }
    }

    /// Overwrites the fields a family reply carries.
    pub fn merge_family(&mut self, block: &ObjectPropertiesFamilyBlock) {
        self.object_id = block.object_id;
        self.owner_id = block.owner_id;
        self.group_id = block.group_id;
        self.last_owner_id = block.last_owner_id;
        self.permissions = Permissions {
            base: block.base_mask,
            owner: block.owner_mask,
            group: block.group_mask,
            everyone: block.everyone_mask,
            next_owner: block.next_owner_mask,
        };
        self.ownership_cost = block.ownership_cost;
        self.sale_type = block.sale_type;
        self.sale_price = block.sale_price;
        self.category = block.category;
        self.name.clone_from(&block.name);
        self.description.clone_from(&block.description);
    }
}
