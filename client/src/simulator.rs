//! One connected simulator: its object tables and inbound dispatch.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use codec::{decode_compressed_block, decode_object_block, decode_terse_block, DecodedObject};
use scene::{ObjectChange, SimulatorObjectTables, TrackedAvatar, TrackedPrimitive};
use wire::{
    CompressedObjectUpdateMessage, DecodeLimits, InboundMessage, KillObjectMessage,
    ObjectUpdateMessage, RegionData, RegionHandle, TerseObjectUpdateMessage,
};

use crate::collaborators::IdentityProvider;
use crate::events::{ClientEvent, EventBus};
use crate::lock;

/// Object state of one simulator.
///
/// Updates are applied in receipt order under the table lock; the
/// interpolation loop takes the same lock. Events are published after the
/// lock is released and carry copies.
pub struct Simulator {
    region_handle: RegionHandle,
    tables: Mutex<SimulatorObjectTables>,
    dilation_bits: AtomicU32,
    connected: AtomicBool,
    limits: DecodeLimits,
    events: EventBus,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("region_handle", &self.region_handle)
            .field("connected", &self.is_connected())
            .field("time_dilation", &self.time_dilation())
            .finish_non_exhaustive()
    }
}

impl Simulator {
    #[must_use]
    pub fn new(
        region_handle: RegionHandle,
        limits: DecodeLimits,
        events: EventBus,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            region_handle,
            tables: Mutex::new(SimulatorObjectTables::new(region_handle)),
            dilation_bits: AtomicU32::new(1.0f32.to_bits()),
            connected: AtomicBool::new(true),
            limits,
            events,
            identity,
        }
    }

    #[must_use]
    pub const fn region_handle(&self) -> RegionHandle {
        self.region_handle
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Marks the simulator gone and drops its objects.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        self.lock_tables().clear();
    }

    /// Latest time dilation reported by the region, in `[0, 1]`.
    #[must_use]
    pub fn time_dilation(&self) -> f32 {
        f32::from_bits(self.dilation_bits.load(Ordering::Relaxed))
    }

    fn set_region(&self, region: RegionData) {
        self.dilation_bits
            .store(region.dilation().to_bits(), Ordering::Relaxed);
    }

    fn lock_tables(&self) -> MutexGuard<'_, SimulatorObjectTables> {
        lock(&self.tables)
    }

    /// Runs `f` against the tables under the lock.
    pub fn with_tables<R>(&self, f: impl FnOnce(&SimulatorObjectTables) -> R) -> R {
        f(&self.lock_tables())
    }

    #[must_use]
    pub fn get_object(&self, local_id: u32) -> Option<TrackedPrimitive> {
        self.lock_tables().primitive(local_id).cloned()
    }

    #[must_use]
    pub fn get_avatar(&self, local_id: u32) -> Option<TrackedAvatar> {
        self.lock_tables().avatar(local_id).cloned()
    }

    #[must_use]
    pub fn get_avatar_by_id(&self, full_id: Uuid) -> Option<TrackedAvatar> {
        self.lock_tables().avatar_by_full_id(full_id).cloned()
    }

    /// Dead-reckons every object by `elapsed` wall time scaled by the
    /// region's time dilation. Returns the number of objects moved.
    pub fn interpolate(&self, elapsed: Duration) -> usize {
        if !self.is_connected() {
            return 0;
        }
        let dt = elapsed.as_secs_f32() * self.time_dilation();
        self.lock_tables().interpolate(dt)
    }

    /// Applies one inbound scene message. Malformed blocks are logged and
    /// skipped; the rest of the message still applies.
    pub fn handle_message(&self, message: &InboundMessage) {
        if !self.is_connected() {
            debug!(region = self.region_handle, message = message.name(), "dropping message for disconnected simulator");
            return;
        }
        match message {
            InboundMessage::ObjectUpdate(msg) => self.on_object_update(msg),
            InboundMessage::ImprovedTerseObjectUpdate(msg) => self.on_terse_update(msg),
            InboundMessage::ObjectUpdateCompressed(msg) => self.on_compressed_update(msg),
            InboundMessage::KillObject(msg) => self.on_kill(msg),
            InboundMessage::ObjectProperties(msg) => {
                for block in &msg.objects {
                    let update = self.lock_tables().apply_properties(block);
                    self.events.publish(ClientEvent::ObjectProperties {
                        region: self.region_handle,
                        local_id: update.local_id,
                        properties: Box::new(update.properties),
                    });
                }
            }
            InboundMessage::ObjectPropertiesFamily(msg) => {
                let update = self.lock_tables().apply_family_properties(&msg.object);
                self.events.publish(ClientEvent::ObjectPropertiesFamily {
                    region: self.region_handle,
                    local_id: update.local_id,
                    properties: Box::new(update.properties),
                });
            }
            InboundMessage::AgentWearablesUpdate(_)
            | InboundMessage::AgentCachedTextureResponse(_) => {
                debug!(message = message.name(), "not a scene message");
            }
        }
    }

    fn on_object_update(&self, msg: &ObjectUpdateMessage) {
        self.set_region(msg.region);
        for block in &msg.objects {
            match decode_object_block(block, &self.limits) {
                Ok(object) => self.apply_object(&object),
                Err(err) => warn!(
                    region = self.region_handle,
                    local_id = block.local_id,
                    error = %err,
                    "skipping malformed ObjectUpdate block"
                ),
            }
        }
    }

    fn on_compressed_update(&self, msg: &CompressedObjectUpdateMessage) {
        self.set_region(msg.region);
        for (index, block) in msg.objects.iter().enumerate() {
            match decode_compressed_block(block, &self.limits) {
                Ok(object) => self.apply_object(&object),
                Err(err) => warn!(
                    region = self.region_handle,
                    block = index,
                    error = %err,
                    "skipping malformed ObjectUpdateCompressed block"
                ),
            }
        }
    }

    fn on_terse_update(&self, msg: &TerseObjectUpdateMessage) {
        self.set_region(msg.region);
        for (index, block) in msg.objects.iter().enumerate() {
            let update = match decode_terse_block(block, &self.limits) {
                Ok(update) => update,
                Err(err) => {
                    warn!(
                        region = self.region_handle,
                        block = index,
                        error = %err,
                        "skipping malformed terse block"
                    );
                    continue;
                }
            };
            let created = self.lock_tables().apply_movement(&update);
            if created {
                debug!(region = self.region_handle, local_id = update.local_id, avatar = update.avatar, "terse update created object");
            }
            self.events.publish(ClientEvent::TerseUpdated {
                region: self.region_handle,
                update: Box::new(update),
                created,
            });
        }
    }

    fn apply_object(&self, object: &DecodedObject) {
        let change = self.lock_tables().apply_object(object);
        let region = self.region_handle;
        match change {
            ObjectChange::Primitive { primitive, created } => {
                if let Some(particles) = primitive.particles.clone() {
                    self.events.publish(ClientEvent::ParticleUpdated {
                        region,
                        local_id: primitive.local_id,
                        particles,
                    });
                }
                self.events.publish(ClientEvent::ObjectUpdated {
                    region,
                    primitive,
                    created,
                });
            }
            ObjectChange::Avatar {
                avatar,
                lookup,
                seat_change,
            } => {
                if avatar.full_id == self.identity.agent_id()
                    && self.identity.local_id() != avatar.local_id
                {
                    debug!(
                        previous = ?lookup.previous_local_id,
                        local_id = avatar.local_id,
                        "own avatar local id changed"
                    );
                    self.identity.set_local_id(avatar.local_id);
                }
                if let Some(change) = seat_change {
                    self.events
                        .publish(ClientEvent::AvatarSitChanged { region, change });
                }
                self.events.publish(ClientEvent::AvatarUpdated {
                    region,
                    avatar,
                    created: lookup.created,
                });
            }
        }
    }

    fn on_kill(&self, msg: &KillObjectMessage) {
        let outcome = self.lock_tables().apply_kill(&msg.local_ids);
        let region = self.region_handle;
        debug!(
            region,
            named = outcome.named.len(),
            removed = outcome.removed.len(),
            "objects killed"
        );
        for change in outcome.unseated {
            self.events
                .publish(ClientEvent::AvatarSitChanged { region, change });
        }
        self.events.publish(ClientEvent::ObjectKilled {
            region,
            local_ids: outcome.named,
        });
        self.events.publish(ClientEvent::ObjectsKilled {
            region,
            local_ids: outcome.removed,
        });
    }
}
