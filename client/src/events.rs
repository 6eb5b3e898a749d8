//! Events published to consumers of a session.

use tokio::sync::broadcast;
use tracing::debug;

use codec::{ObjectMovementUpdate, ParticleBlock};
use scene::{ObjectProperties, SeatChange, TrackedAvatar, TrackedPrimitive};
use wire::RegionHandle;

/// Something changed in the scene or the agent's appearance.
///
/// Events carry copies; the tables they describe may have moved on by the
/// time a consumer sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    ObjectUpdated {
        region: RegionHandle,
        primitive: Box<TrackedPrimitive>,
        created: bool,
    },
    AvatarUpdated {
        region: RegionHandle,
        avatar: Box<TrackedAvatar>,
        created: bool,
    },
    TerseUpdated {
        region: RegionHandle,
        update: Box<ObjectMovementUpdate>,
        created: bool,
    },
    /// The ids named by a kill message.
    ObjectKilled {
        region: RegionHandle,
        local_ids: Vec<u32>,
    },
    /// Every id a kill removed, including linked descendants.
    ObjectsKilled {
        region: RegionHandle,
        local_ids: Vec<u32>,
    },
    ObjectProperties {
        region: RegionHandle,
        local_id: Option<u32>,
        properties: Box<ObjectProperties>,
    },
    ObjectPropertiesFamily {
        region: RegionHandle,
        local_id: Option<u32>,
        properties: Box<ObjectProperties>,
    },
    AvatarSitChanged {
        region: RegionHandle,
        change: SeatChange,
    },
    ParticleUpdated {
        region: RegionHandle,
        local_id: u32,
        particles: ParticleBlock,
    },
    AppearanceSetComplete {
        success: bool,
    },
}

/// Per-session broadcast bus.
///
/// Publishing never blocks; subscribers that fall behind lose the oldest
/// events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ClientEvent) {
        if self.sender.send(event).is_err() {
            debug!("event dropped, no subscribers");
        }
    }
}
