//! A client session: connected simulators, background tasks and commands.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use scene::{TrackedAvatar, TrackedPrimitive};
use wire::{InboundMessage, RegionHandle, WearableType};

use crate::appearance::{AppearanceManager, WearableRef};
use crate::collaborators::{AssetStore, BakeUploader, IdentityProvider, Transport};
use crate::config::ClientConfig;
use crate::error::{AppearanceResult, SessionError, SessionResult};
use crate::events::{ClientEvent, EventBus};
use crate::lock;
use crate::outbox::Outbox;
use crate::scheduler::InterpolationScheduler;
use crate::simulator::Simulator;

/// Shared map of connected simulators.
#[derive(Debug, Clone, Default)]
pub struct SimulatorRegistry {
    simulators: Arc<Mutex<BTreeMap<RegionHandle, Arc<Simulator>>>>,
}

impl SimulatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a simulator, returning the one it replaced.
    pub fn insert(&self, simulator: Arc<Simulator>) -> Option<Arc<Simulator>> {
        lock(&self.simulators).insert(simulator.region_handle(), simulator)
    }

    #[must_use]
    pub fn get(&self, region: RegionHandle) -> Option<Arc<Simulator>> {
        lock(&self.simulators).get(&region).cloned()
    }

    pub fn remove(&self, region: RegionHandle) -> Option<Arc<Simulator>> {
        lock(&self.simulators).remove(&region)
    }

    /// Simulators still connected, in region handle order.
    #[must_use]
    pub fn connected(&self) -> Vec<Arc<Simulator>> {
        lock(&self.simulators)
            .values()
            .filter(|simulator| simulator.is_connected())
            .cloned()
            .collect()
    }

    /// Whether any simulator is still connected.
    #[must_use]
    pub fn has_connected(&self) -> bool {
        lock(&self.simulators)
            .values()
            .any(|simulator| simulator.is_connected())
    }

    /// Removes and returns every simulator.
    pub fn drain(&self) -> Vec<Arc<Simulator>> {
        std::mem::take(&mut *lock(&self.simulators))
            .into_values()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.simulators).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collaborators a session is built from.
#[derive(Clone)]
pub struct SessionServices {
    pub transport: Arc<dyn Transport>,
    pub identity: Arc<dyn IdentityProvider>,
    pub assets: Arc<dyn AssetStore>,
    pub uploader: Arc<dyn BakeUploader>,
}

/// Sends each inbound message to the component that owns it.
#[derive(Debug, Clone)]
struct Router {
    simulators: SimulatorRegistry,
    appearance: Arc<AppearanceManager>,
}

impl Router {
    fn route(&self, region: RegionHandle, message: &InboundMessage) {
        match message {
            InboundMessage::AgentWearablesUpdate(msg) => self.appearance.on_wearables_update(msg),
            InboundMessage::AgentCachedTextureResponse(msg) => {
                self.appearance.on_cached_textures(msg);
            }
            _ => match self.simulators.get(region) {
                Some(simulator) => simulator.handle_message(message),
                None => debug!(
                    region,
                    message = message.name(),
                    "message for unknown simulator"
                ),
            },
        }
    }
}

/// One logged-in agent.
///
/// Owns the outbound queue, the inbound decode worker, the interpolation
/// loop and the appearance pipeline. Everything stops on
/// [`ClientSession::shutdown`].
pub struct ClientSession {
    config: ClientConfig,
    events: EventBus,
    identity: Arc<dyn IdentityProvider>,
    router: Router,
    inbound: mpsc::Sender<(RegionHandle, InboundMessage)>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("agent_id", &self.identity.agent_id())
            .field("simulators", &self.router.simulators.len())
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl ClientSession {
    /// Starts the session's background tasks.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(config: ClientConfig, services: SessionServices) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let events = EventBus::new(config.event_capacity);
        let simulators = SimulatorRegistry::new();

        let (outbox, outbox_task) = Outbox::spawn(
            services.transport,
            simulators.clone(),
            config.outbound_queue_depth,
            config.send_spacing(),
            shutdown_rx.clone(),
        );
        let appearance = AppearanceManager::new(
            config.clone(),
            Arc::clone(&services.identity),
            services.assets,
            services.uploader,
            outbox,
            events.clone(),
            shutdown_rx.clone(),
        );
        let router = Router {
            simulators: simulators.clone(),
            appearance,
        };

        let interpolation = InterpolationScheduler::new(
            config.interpolation_interval(),
            config.interpolation_min_delay(),
        )
        .spawn(simulators, shutdown_rx.clone());

        let (inbound, receiver) = mpsc::channel(config.inbound_queue_depth.max(1));
        let worker = tokio::spawn(inbound_worker(router.clone(), receiver, shutdown_rx));

        info!(agent_id = %services.identity.agent_id(), "session started");
        Self {
            config,
            events,
            identity: services.identity,
            router,
            inbound,
            shutdown,
            tasks: Mutex::new(vec![outbox_task, interpolation, worker]),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn agent_id(&self) -> Uuid {
        self.identity.agent_id()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        !*self.shutdown.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn appearance(&self) -> &Arc<AppearanceManager> {
        &self.router.appearance
    }

    /// Registers a simulator for `region`. Reconnecting replaces the old
    /// simulator and drops its objects.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disconnected`] after shutdown.
    pub fn connect_simulator(&self, region: RegionHandle) -> SessionResult<Arc<Simulator>> {
        if !self.is_live() {
            return Err(SessionError::Disconnected);
        }
        let simulator = Arc::new(Simulator::new(
            region,
            self.config.decode_limits.clone(),
            self.events.clone(),
            Arc::clone(&self.identity),
        ));
        if let Some(previous) = self.router.simulators.insert(Arc::clone(&simulator)) {
            previous.disconnect();
            debug!(region, "replaced simulator");
        }
        info!(region, "simulator connected");
        Ok(simulator)
    }

    /// Drops a simulator and everything it tracked.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSimulator`] when nothing is connected for
    /// `region`.
    pub fn disconnect_simulator(&self, region: RegionHandle) -> SessionResult<()> {
        let simulator = self
            .router
            .simulators
            .remove(region)
            .ok_or(SessionError::UnknownSimulator(region))?;
        simulator.disconnect();
        info!(region, "simulator disconnected");
        Ok(())
    }

    #[must_use]
    pub fn simulator(&self, region: RegionHandle) -> Option<Arc<Simulator>> {
        self.router.simulators.get(region)
    }

    /// Queues a decoded message for the inbound worker.
    ///
    /// # Errors
    ///
    /// [`SessionError::QueueFull`] when the worker is behind, or
    /// [`SessionError::Disconnected`] after shutdown.
    pub fn enqueue(&self, region: RegionHandle, message: InboundMessage) -> SessionResult<()> {
        if !self.is_live() {
            return Err(SessionError::Disconnected);
        }
        self.inbound
            .try_send((region, message))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => SessionError::QueueFull { queue: "inbound" },
                mpsc::error::TrySendError::Closed(_) => SessionError::Disconnected,
            })
    }

    /// Applies a message on the caller's task, bypassing the queue.
    pub fn handle_inbound(&self, region: RegionHandle, message: &InboundMessage) {
        if self.is_live() {
            self.router.route(region, message);
        }
    }

    #[must_use]
    pub fn get_object(&self, region: RegionHandle, local_id: u32) -> Option<TrackedPrimitive> {
        self.simulator(region)?.get_object(local_id)
    }

    #[must_use]
    pub fn get_avatar(&self, region: RegionHandle, local_id: u32) -> Option<TrackedAvatar> {
        self.simulator(region)?.get_avatar(local_id)
    }

    /// See [`AppearanceManager::request_set_appearance`].
    ///
    /// # Errors
    ///
    /// As for the appearance manager.
    pub async fn request_set_appearance(&self, force_rebake: bool) -> AppearanceResult<bool> {
        self.router
            .appearance
            .request_set_appearance(force_rebake)
            .await
    }

    /// See [`AppearanceManager::add_to_outfit`].
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn add_to_outfit(&self, items: &[WearableRef]) -> SessionResult<()> {
        self.router.appearance.add_to_outfit(items)
    }

    /// See [`AppearanceManager::remove_from_outfit`].
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn remove_from_outfit(&self, kinds: &[WearableType]) -> SessionResult<()> {
        self.router.appearance.remove_from_outfit(kinds)
    }

    /// See [`AppearanceManager::replace_outfit`].
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn replace_outfit(&self, items: &[WearableRef]) -> SessionResult<()> {
        self.router.appearance.replace_outfit(items)
    }

    /// Stops every background task, cancels a pending rebake and
    /// disconnects all simulators. Idempotent.
    pub async fn shutdown(&self) {
        if self.shutdown.send_replace(true) {
            return;
        }
        self.router.appearance.stop();
        for simulator in self.router.simulators.drain() {
            simulator.disconnect();
        }
        let tasks = std::mem::take(&mut *lock(&self.tasks));
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "session task ended abnormally");
            }
        }
        info!("session stopped");
    }
}

async fn inbound_worker(
    router: Router,
    mut receiver: mpsc::Receiver<(RegionHandle, InboundMessage)>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            item = receiver.recv() => match item {
                Some((region, message)) => router.route(region, &message),
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("inbound worker stopped");
}
