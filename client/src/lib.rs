//! Client-side scene replication and avatar appearance for gridsync.
//!
//! A [`ClientSession`] owns one agent's view of the world:
//!
//! - one [`Simulator`] per connected region, each holding the object tables
//!   that inbound updates are applied to,
//! - a bounded inbound queue drained by a decode worker,
//! - an [`Outbox`] that spaces outbound sends,
//! - an [`InterpolationScheduler`] that dead-reckons tracked objects,
//! - an [`AppearanceManager`] that bakes and publishes the agent's outfit.
//!
//! Consumers observe changes through [`ClientEvent`]s from
//! [`ClientSession::subscribe`] and query copies of tracked objects.
//! Network, asset and upload services are supplied through the traits in
//! [`collaborators`].

pub mod appearance;
pub mod collaborators;
mod config;
mod error;
mod events;
mod outbox;
mod scheduler;
mod session;
mod simulator;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use appearance::{AppearanceManager, AppearanceStage, BakeLayer, TextureSlot, WearableRef};
pub use collaborators::{AssetKind, AssetStore, BakeUploader, BoxFuture, IdentityProvider, Transport};
pub use config::ClientConfig;
pub use error::{AppearanceError, AppearanceResult, SessionError, SessionResult};
pub use events::{ClientEvent, EventBus};
pub use outbox::Outbox;
pub use scheduler::InterpolationScheduler;
pub use session::{ClientSession, SessionServices, SimulatorRegistry};
pub use simulator::Simulator;

/// Locks a mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
