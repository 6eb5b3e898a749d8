//! The appearance run and outfit commands.
//!
//! A run moves through [`AppearanceStage`]s in order:
//!
//! ```text
//! Idle -> FetchWearables -> DownloadAssets -> [CacheCheck] -> BakeAndUpload
//!      -> SendAppearance -> Idle | Failed
//! ```
//!
//! The cache check happens on the first run only and is skipped when a
//! rebake is forced. Only one run is active at a time.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use texture::TextureEntry;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::{uuid, Uuid};
use wire::{
    AgentCachedTextureResponseMessage, AgentSetAppearanceMessage, AgentWearablesUpdateMessage,
    CachedTextureBlock, OutboundMessage, WearableType,
};

use super::bake::{composite_layer, encode_bake, layer_cache_hash, BakeInput};
use super::layer::{BakeLayer, TextureSlot};
use super::params::VisualParamValues;
use super::pool::Pool;
use super::wearable::{WearableAsset, WearableRef};
use crate::collaborators::{AssetStore, BakeUploader, IdentityProvider};
use crate::config::ClientConfig;
use crate::error::{AppearanceError, AppearanceResult, SessionError, SessionResult};
use crate::events::{ClientEvent, EventBus};
use crate::lock;
use crate::outbox::Outbox;

/// Texture shown on slots nothing is worn on.
pub const DEFAULT_AVATAR_TEXTURE: Uuid = uuid!("c228d1cf-4b5d-4ba8-84f4-899a0796aa97");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppearanceStage {
    #[default]
    Idle,
    FetchWearables,
    DownloadAssets,
    CacheCheck,
    BakeAndUpload,
    SendAppearance,
    Failed,
}

/// A layer texture and the cache hash of the outfit it was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BakedTexture {
    hash: Uuid,
    texture_id: Uuid,
}

#[derive(Debug, Default)]
struct Wardrobe {
    outfit: BTreeMap<WearableType, WearableRef>,
    outfit_known: bool,
    wearables_serial: Option<u32>,
    /// Parsed wearables by asset id.
    assets: HashMap<Uuid, WearableAsset>,
    /// Decoded textures by texture id.
    images: HashMap<Uuid, RgbaImage>,
    baked: BTreeMap<BakeLayer, BakedTexture>,
    cache_checked: bool,
    cache_serial: i32,
    appearance_serial: u32,
    stage: AppearanceStage,
}

impl Wardrobe {
    fn layer_hashes(&self) -> BTreeMap<BakeLayer, Uuid> {
        BakeLayer::ALL
            .iter()
            .filter_map(|&layer| layer_cache_hash(layer, &self.outfit).map(|hash| (layer, hash)))
            .collect()
    }

    /// Texture of every slot some worn wearable fills.
    fn slot_textures(&self) -> BTreeMap<TextureSlot, Uuid> {
        self.outfit
            .values()
            .filter_map(|worn| self.assets.get(&worn.asset_id))
            .flat_map(|asset| asset.textures.iter().map(|(slot, id)| (*slot, *id)))
            .filter(|(_, id)| !id.is_nil() && *id != DEFAULT_AVATAR_TEXTURE)
            .collect()
    }

    fn worn_assets(&self) -> BTreeMap<WearableType, WearableAsset> {
        self.outfit
            .iter()
            .filter_map(|(kind, worn)| {
                self.assets
                    .get(&worn.asset_id)
                    .map(|asset| (*kind, asset.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct Waiters {
    wearables: Option<oneshot::Sender<()>>,
    cache: Option<(i32, oneshot::Sender<Vec<CachedTextureBlock>>)>,
    rebake: Option<JoinHandle<()>>,
}

/// Clears the running flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct BakeJob {
    layer: BakeLayer,
    inputs: Vec<BakeInput>,
}

/// Owns the agent's outfit and publishes its baked appearance.
pub struct AppearanceManager {
    config: ClientConfig,
    identity: Arc<dyn IdentityProvider>,
    assets: Arc<dyn AssetStore>,
    uploader: Arc<dyn BakeUploader>,
    outbox: Outbox,
    events: EventBus,
    shutdown: watch::Receiver<bool>,
    running: AtomicBool,
    wardrobe: Mutex<Wardrobe>,
    waiters: Mutex<Waiters>,
}

impl std::fmt::Debug for AppearanceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppearanceManager")
            .field("stage", &self.stage())
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl AppearanceManager {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        identity: Arc<dyn IdentityProvider>,
        assets: Arc<dyn AssetStore>,
        uploader: Arc<dyn BakeUploader>,
        outbox: Outbox,
        events: EventBus,
        shutdown: watch::Receiver<bool>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            assets,
            uploader,
            outbox,
            events,
            shutdown,
            running: AtomicBool::new(false),
            wardrobe: Mutex::new(Wardrobe::default()),
            waiters: Mutex::new(Waiters::default()),
        })
    }

    #[must_use]
    pub fn stage(&self) -> AppearanceStage {
        lock(&self.wardrobe).stage
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Current outfit in wearable type order.
    #[must_use]
    pub fn outfit(&self) -> Vec<WearableRef> {
        lock(&self.wardrobe).outfit.values().copied().collect()
    }

    /// Texture currently advertised for each baked layer.
    #[must_use]
    pub fn baked_textures(&self) -> BTreeMap<BakeLayer, Uuid> {
        lock(&self.wardrobe)
            .baked
            .iter()
            .map(|(layer, baked)| (*layer, baked.texture_id))
            .collect()
    }

    fn is_live(&self) -> bool {
        !*self.shutdown.borrow()
    }

    /// Fails once shutdown has begun. Checked after every await that hands
    /// results back to the wardrobe.
    fn ensure_live(&self) -> AppearanceResult<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(SessionError::Disconnected.into())
        }
    }

    fn set_stage(&self, stage: AppearanceStage) {
        debug!(?stage, "appearance stage");
        lock(&self.wardrobe).stage = stage;
    }

    /// Runs the pipeline once and publishes
    /// [`ClientEvent::AppearanceSetComplete`].
    ///
    /// Returns `Ok(true)` when every layer was baked or found in the cache,
    /// `Ok(false)` when the appearance was sent with some layers missing.
    ///
    /// # Errors
    ///
    /// [`AppearanceError::AlreadyRunning`] when another run is active (no
    /// event is published in that case), a timeout when the outfit is
    /// unknown and could not be fetched, or a session error when sending
    /// failed.
    pub async fn request_set_appearance(&self, force_rebake: bool) -> AppearanceResult<bool> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            warn!("appearance run already in progress, request ignored");
            return Err(AppearanceError::AlreadyRunning);
        };
        info!(force_rebake, "appearance run started");

        let result = self.run(force_rebake).await;
        match &result {
            Ok(complete) => {
                self.set_stage(AppearanceStage::Idle);
                info!(complete, "appearance run finished");
            }
            Err(err) => {
                self.set_stage(AppearanceStage::Failed);
                warn!(error = %err, "appearance run failed");
            }
        }
        if self.is_live() {
            self.events.publish(ClientEvent::AppearanceSetComplete {
                success: matches!(result, Ok(true)),
            });
        }
        result
    }

    async fn run(&self, force_rebake: bool) -> AppearanceResult<bool> {
        self.set_stage(AppearanceStage::FetchWearables);
        self.fetch_wearables().await?;

        self.set_stage(AppearanceStage::DownloadAssets);
        self.download_wearables().await?;

        let first_run = !lock(&self.wardrobe).cache_checked;
        if force_rebake {
            let mut wardrobe = lock(&self.wardrobe);
            wardrobe.baked.clear();
            wardrobe.cache_checked = true;
        } else if first_run {
            self.set_stage(AppearanceStage::CacheCheck);
            self.check_cache().await?;
        }

        self.set_stage(AppearanceStage::BakeAndUpload);
        let complete = self.bake_and_upload().await?;

        self.ensure_live()?;
        self.set_stage(AppearanceStage::SendAppearance);
        self.send_appearance().await?;
        Ok(complete)
    }

    async fn fetch_wearables(&self) -> AppearanceResult<()> {
        let (sender, receiver) = oneshot::channel();
        lock(&self.waiters).wearables = Some(sender);
        self.outbox
            .send(
                OutboundMessage::AgentWearablesRequest {
                    agent_id: self.identity.agent_id(),
                    session_id: self.identity.session_id(),
                },
                true,
            )
            .await?;

        let answered = timeout(self.config.wearables_timeout(), receiver).await;
        lock(&self.waiters).wearables = None;
        if matches!(answered, Ok(Ok(()))) {
            return Ok(());
        }
        if lock(&self.wardrobe).outfit_known {
            warn!("wearables request timed out, keeping the known outfit");
            Ok(())
        } else {
            Err(AppearanceError::Timeout { stage: "wearables" })
        }
    }

    async fn download_wearables(&self) -> AppearanceResult<()> {
        let missing: Vec<(WearableRef, WearableRef)> = {
            let wardrobe = lock(&self.wardrobe);
            wardrobe
                .outfit
                .values()
                .filter(|worn| !wardrobe.assets.contains_key(&worn.asset_id))
                .map(|worn| (*worn, *worn))
                .collect()
        };
        if missing.is_empty() {
            return Ok(());
        }
        debug!(count = missing.len(), "downloading wearables");

        let store = Arc::clone(&self.assets);
        let results = self
            .download_pool("wearables")
            .run(missing, move |worn: WearableRef| {
                let store = Arc::clone(&store);
                async move {
                    let data = store.request_asset(worn.asset_id, worn.asset_kind()).await?;
                    WearableAsset::parse(&data)
                }
            })
            .await;

        self.ensure_live()?;
        let mut wardrobe = lock(&self.wardrobe);
        for (worn, result) in results {
            match result {
                Ok(asset) => {
                    if asset.wearable_type != worn.wearable_type {
                        debug!(asset = %worn.asset_id, worn = ?worn.wearable_type, parsed = ?asset.wearable_type, "wearable type mismatch");
                    }
                    wardrobe.assets.insert(worn.asset_id, asset);
                }
                Err(err) => warn!(asset = %worn.asset_id, error = %err, "wearable download failed"),
            }
        }
        Ok(())
    }

    async fn download_images(&self, ids: BTreeSet<Uuid>) -> AppearanceResult<()> {
        let missing: Vec<(Uuid, Uuid)> = {
            let wardrobe = lock(&self.wardrobe);
            ids.into_iter()
                .filter(|id| !wardrobe.images.contains_key(id))
                .map(|id| (id, id))
                .collect()
        };
        if missing.is_empty() {
            return Ok(());
        }
        debug!(count = missing.len(), "downloading textures");

        let store = Arc::clone(&self.assets);
        let results = self
            .download_pool("textures")
            .run(missing, move |id: Uuid| {
                let store = Arc::clone(&store);
                async move { store.request_image(id).await }
            })
            .await;

        self.ensure_live()?;
        let mut wardrobe = lock(&self.wardrobe);
        for (id, result) in results {
            match result {
                Ok(image) => {
                    wardrobe.images.insert(id, image);
                }
                Err(err) => warn!(texture = %id, error = %err, "texture download failed"),
            }
        }
        Ok(())
    }

    fn download_pool(&self, stage: &'static str) -> Pool {
        Pool {
            stage,
            concurrency: self.config.max_concurrent_downloads,
            job_timeout: Some(self.config.download_timeout()),
            batch_timeout: Some(self.config.download_batch_timeout()),
        }
    }

    async fn check_cache(&self) -> AppearanceResult<()> {
        let (hashes, serial) = {
            let mut wardrobe = lock(&self.wardrobe);
            wardrobe.cache_checked = true;
            wardrobe.cache_serial += 1;
            (wardrobe.layer_hashes(), wardrobe.cache_serial)
        };
        if hashes.is_empty() {
            return Ok(());
        }

        let requests = hashes
            .iter()
            .map(|(layer, hash)| CachedTextureBlock {
                texture_id: *hash,
                texture_index: slot_byte(layer.baked_slot()),
            })
            .collect();
        let (sender, receiver) = oneshot::channel();
        lock(&self.waiters).cache = Some((serial, sender));
        self.outbox
            .send(
                OutboundMessage::AgentCachedTexture {
                    agent_id: self.identity.agent_id(),
                    session_id: self.identity.session_id(),
                    serial_num: serial,
                    requests,
                },
                true,
            )
            .await?;

        let Ok(Ok(textures)) = timeout(self.config.cache_check_timeout(), receiver).await else {
            lock(&self.waiters).cache = None;
            warn!("cache check timed out, baking every layer");
            return Ok(());
        };

        self.ensure_live()?;
        let mut hits = 0;
        let mut wardrobe = lock(&self.wardrobe);
        for block in textures.into_iter().filter(|block| !block.texture_id.is_nil()) {
            let Some(layer) = layer_for_baked_index(block.texture_index) else {
                continue;
            };
            if let Some(&hash) = hashes.get(&layer) {
                wardrobe.baked.insert(
                    layer,
                    BakedTexture {
                        hash,
                        texture_id: block.texture_id,
                    },
                );
                hits += 1;
            }
        }
        info!(hits, requested = hashes.len(), "cache check answered");
        Ok(())
    }

    /// Bakes and uploads every worn layer without a current texture.
    /// Returns `false` when any layer could not be uploaded.
    async fn bake_and_upload(&self) -> AppearanceResult<bool> {
        let (pending, slot_textures) = {
            let mut guard = lock(&self.wardrobe);
            let wardrobe = &mut *guard;
            let hashes = wardrobe.layer_hashes();
            wardrobe.baked.retain(|layer, baked| hashes.get(layer) == Some(&baked.hash));
            let pending: Vec<(BakeLayer, Uuid)> = hashes
                .into_iter()
                .filter(|(layer, _)| !wardrobe.baked.contains_key(layer))
                .collect();
            (pending, wardrobe.slot_textures())
        };
        if pending.is_empty() {
            debug!("every layer is current");
            return Ok(true);
        }

        let needed: BTreeSet<Uuid> = pending
            .iter()
            .flat_map(|(layer, _)| layer.source_slots())
            .filter_map(|slot| slot_textures.get(slot).copied())
            .collect();
        self.download_images(needed).await?;

        let jobs: Vec<((BakeLayer, Uuid), BakeJob)> = {
            let wardrobe = lock(&self.wardrobe);
            pending
                .iter()
                .map(|&(layer, hash)| {
                    let inputs = layer
                        .source_slots()
                        .iter()
                        .filter_map(|slot| {
                            let id = *slot_textures.get(slot)?;
                            Some(BakeInput::new(*slot, id, wardrobe.images.get(&id).cloned()))
                        })
                        .collect();
                    ((layer, hash), BakeJob { layer, inputs })
                })
                .collect()
        };
        info!(layers = jobs.len(), "baking layers");

        let uploader = Arc::clone(&self.uploader);
        let attempts = 1 + self.config.upload_retries;
        let upload_timeout = self.config.upload_timeout();
        let pool = Pool {
            stage: "upload",
            concurrency: self.config.max_concurrent_uploads,
            job_timeout: None,
            batch_timeout: None,
        };
        let results = pool
            .run(jobs, move |job: BakeJob| {
                let uploader = Arc::clone(&uploader);
                async move {
                    let data = encode_bake(&composite_layer(job.layer, &job.inputs))?;
                    for attempt in 1..=attempts {
                        match timeout(upload_timeout, uploader.upload_bake(job.layer, data.clone())).await {
                            Ok(Ok(texture_id)) => return Ok(texture_id),
                            Ok(Err(err)) => {
                                warn!(layer = ?job.layer, attempt, error = %err, "bake upload failed");
                            }
                            Err(_) => warn!(layer = ?job.layer, attempt, "bake upload timed out"),
                        }
                    }
                    Err(AppearanceError::Upload {
                        layer: job.layer,
                        attempts,
                    })
                }
            })
            .await;

        self.ensure_live()?;
        let mut complete = results.len() == pending.len();
        let mut wardrobe = lock(&self.wardrobe);
        for ((layer, hash), result) in results {
            match result {
                Ok(texture_id) => {
                    debug!(?layer, %texture_id, "layer uploaded");
                    wardrobe.baked.insert(layer, BakedTexture { hash, texture_id });
                }
                Err(err) => {
                    warn!(?layer, error = %err, "layer left unbaked");
                    complete = false;
                }
            }
        }
        Ok(complete)
    }

    async fn send_appearance(&self) -> AppearanceResult<()> {
        let message = {
            let mut wardrobe = lock(&self.wardrobe);
            let params = VisualParamValues::resolve(&wardrobe.worn_assets());

            let mut entry = TextureEntry::new(DEFAULT_AVATAR_TEXTURE);
            for (slot, id) in wardrobe.slot_textures() {
                set_slot(&mut entry, slot, id);
            }
            for (layer, baked) in &wardrobe.baked {
                set_slot(&mut entry, layer.baked_slot(), baked.texture_id);
            }
            if let Some(id) = self.config.client_identification {
                for slot in TextureSlot::CLIENT_ID {
                    set_slot(&mut entry, slot, id);
                }
            }

            let wearable_cache = wardrobe
                .layer_hashes()
                .into_iter()
                .map(|(layer, hash)| CachedTextureBlock {
                    texture_id: hash,
                    texture_index: slot_byte(layer.baked_slot()),
                })
                .collect();

            wardrobe.appearance_serial += 1;
            AgentSetAppearanceMessage {
                agent_id: self.identity.agent_id(),
                session_id: self.identity.session_id(),
                serial_num: wardrobe.appearance_serial,
                size: params.avatar_size(),
                wearable_cache,
                texture_entry: entry.to_bytes(),
                visual_params: params.to_bytes(),
            }
        };
        info!(serial = message.serial_num, "sending appearance");
        self.outbox
            .send(OutboundMessage::AgentSetAppearance(message), true)
            .await?;
        Ok(())
    }

    /// Records the simulator's view of the outfit and wakes a run waiting
    /// for it. Updates older than the last one seen are ignored.
    pub fn on_wearables_update(&self, message: &AgentWearablesUpdateMessage) {
        {
            let mut wardrobe = lock(&self.wardrobe);
            if wardrobe
                .wearables_serial
                .is_some_and(|last| message.serial_num < last)
            {
                debug!(serial = message.serial_num, "stale wearables update");
                return;
            }
            wardrobe.wearables_serial = Some(message.serial_num);
            wardrobe.outfit = message
                .wearables
                .iter()
                .filter(|block| {
                    block.wearable_type != WearableType::Invalid && !block.asset_id.is_nil()
                })
                .map(|block| {
                    (
                        block.wearable_type,
                        WearableRef {
                            item_id: block.item_id,
                            asset_id: block.asset_id,
                            wearable_type: block.wearable_type,
                        },
                    )
                })
                .collect();
            wardrobe.outfit_known = true;
            info!(worn = wardrobe.outfit.len(), "outfit received");
        }
        if let Some(waiter) = lock(&self.waiters).wearables.take() {
            let _ = waiter.send(());
        }
    }

    /// Hands a cache-check answer to the run that asked for it.
    pub fn on_cached_textures(&self, message: &AgentCachedTextureResponseMessage) {
        let mut waiters = lock(&self.waiters);
        match waiters.cache.take() {
            Some((serial, waiter)) if serial == message.serial_num => {
                let _ = waiter.send(message.textures.clone());
            }
            other => {
                waiters.cache = other;
                debug!(serial = message.serial_num, "unexpected cached texture response");
            }
        }
    }

    /// Wears `items`, replacing whatever was worn of the same types.
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn add_to_outfit(self: &Arc<Self>, items: &[WearableRef]) -> SessionResult<()> {
        {
            let mut wardrobe = lock(&self.wardrobe);
            for item in items.iter().filter(|item| item.wearable_type != WearableType::Invalid) {
                wardrobe.outfit.insert(item.wearable_type, *item);
            }
        }
        self.outfit_changed()
    }

    /// Takes off the given clothing types. Body parts stay worn.
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn remove_from_outfit(self: &Arc<Self>, kinds: &[WearableType]) -> SessionResult<()> {
        {
            let mut wardrobe = lock(&self.wardrobe);
            for kind in kinds {
                if kind.is_body_part() {
                    warn!(?kind, "body parts cannot be removed");
                    continue;
                }
                wardrobe.outfit.remove(kind);
            }
        }
        self.outfit_changed()
    }

    /// Replaces all clothing with `items`. Body parts are only replaced
    /// when `items` carries one of the same type.
    ///
    /// # Errors
    ///
    /// Fails when the outbound queue is full or closed, or no simulator is
    /// connected.
    pub fn replace_outfit(self: &Arc<Self>, items: &[WearableRef]) -> SessionResult<()> {
        {
            let mut wardrobe = lock(&self.wardrobe);
            wardrobe.outfit.retain(|kind, _| kind.is_body_part());
            for item in items.iter().filter(|item| item.wearable_type != WearableType::Invalid) {
                wardrobe.outfit.insert(item.wearable_type, *item);
            }
        }
        self.outfit_changed()
    }

    fn outfit_changed(self: &Arc<Self>) -> SessionResult<()> {
        let wearables = {
            let wardrobe = lock(&self.wardrobe);
            WearableType::ALL
                .iter()
                .map(|kind| {
                    let item = wardrobe.outfit.get(kind).map_or(Uuid::nil(), |worn| worn.item_id);
                    (item, *kind)
                })
                .collect()
        };
        self.outbox.try_send(
            OutboundMessage::AgentIsNowWearing {
                agent_id: self.identity.agent_id(),
                session_id: self.identity.session_id(),
                wearables,
            },
            true,
        )?;
        self.schedule_rebake();
        Ok(())
    }

    /// Starts a forced run once the outfit has been quiet for the rebake
    /// delay. A later call restarts the wait.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule_rebake(self: &Arc<Self>) {
        let mut waiters = lock(&self.waiters);
        if let Some(previous) = waiters.rebake.take() {
            previous.abort();
        }
        let this = Arc::clone(self);
        let delay = self.config.rebake_delay();
        let mut shutdown = self.shutdown.clone();
        waiters.rebake = Some(tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => return,
            }
            debug!("rebake delay elapsed");
            // Detached so a later reschedule cannot cancel a run in progress.
            tokio::spawn(async move {
                if let Err(err) = this.request_set_appearance(true).await {
                    debug!(error = %err, "rebake did not complete");
                }
            });
        }));
    }

    /// Cancels a pending rebake and wakes any run waiting on a reply.
    pub fn stop(&self) {
        let mut waiters = lock(&self.waiters);
        if let Some(rebake) = waiters.rebake.take() {
            rebake.abort();
        }
        waiters.wearables = None;
        waiters.cache = None;
    }
}

fn set_slot(entry: &mut TextureEntry, slot: TextureSlot, id: Uuid) {
    if let Ok(face) = entry.create_face(slot.index()) {
        face.set_texture_id(id);
    }
}

fn slot_byte(slot: TextureSlot) -> u8 {
    u8::try_from(slot.index()).unwrap_or(u8::MAX)
}

fn layer_for_baked_index(index: u8) -> Option<BakeLayer> {
    BakeLayer::ALL
        .into_iter()
        .find(|layer| layer.baked_slot().index() == usize::from(index))
}
