//! Services a session consumes but does not implement.

use std::future::Future;
use std::pin::Pin;

use image::RgbaImage;
use uuid::Uuid;
use wire::OutboundMessage;

use crate::appearance::BakeLayer;
use crate::error::{AppearanceResult, SessionResult};

/// Boxed future returned by asynchronous collaborators.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends framed messages to the simulator.
pub trait Transport: Send + Sync {
    fn send(&self, message: OutboundMessage, reliable: bool) -> SessionResult<()>;
}

/// Who the agent is.
pub trait IdentityProvider: Send + Sync {
    fn agent_id(&self) -> Uuid;
    fn session_id(&self) -> Uuid;
    /// The agent's own avatar local id in the current region, 0 when unknown.
    fn local_id(&self) -> u32;
    /// Called when the agent's avatar shows up under a new local id.
    fn set_local_id(&self, local_id: u32);
}

/// Asset category used when requesting a wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Bodypart,
    Clothing,
}

/// Fetches assets and decoded textures.
pub trait AssetStore: Send + Sync {
    fn request_asset(&self, asset_id: Uuid, kind: AssetKind) -> BoxFuture<'_, AppearanceResult<Vec<u8>>>;
    fn request_image(&self, texture_id: Uuid) -> BoxFuture<'_, AppearanceResult<RgbaImage>>;
}

/// Uploads a finished bake and returns its texture id.
pub trait BakeUploader: Send + Sync {
    fn upload_bake(&self, layer: BakeLayer, data: Vec<u8>) -> BoxFuture<'_, AppearanceResult<Uuid>>;
}
