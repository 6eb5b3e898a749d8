//! Error types for sessions and the appearance pipeline.

use std::fmt;

use uuid::Uuid;
use wire::RegionHandle;

use crate::appearance::BakeLayer;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for appearance operations.
pub type AppearanceResult<T> = Result<T, AppearanceError>;

/// Errors surfaced to callers of session commands.
#[derive(Debug)]
#[non_exhaustive]
pub enum SessionError {
    /// The configuration could not be parsed.
    Config(toml::de::Error),

    /// The session or simulator is shut down.
    Disconnected,

    /// A bounded queue had no room.
    QueueFull { queue: &'static str },

    /// No simulator is connected for the region.
    UnknownSimulator(RegionHandle),

    /// An outbound message was refused because no simulator is connected.
    NoSimulator,

    /// The transport refused a message.
    Transport(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Disconnected => write!(f, "session is disconnected"),
            Self::QueueFull { queue } => write!(f, "{queue} queue is full"),
            Self::UnknownSimulator(handle) => write!(f, "no simulator for region {handle:#x}"),
            Self::NoSimulator => write!(f, "no simulator is connected"),
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err)
    }
}

/// Errors raised by one appearance run or its collaborators.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppearanceError {
    /// Another run is in progress.
    AlreadyRunning,

    /// A correlated reply or batch did not arrive in time.
    Timeout { stage: &'static str },

    /// No wearables are known and none could be fetched.
    NoWearables,

    /// An asset or image request failed.
    Asset { id: Uuid, reason: String },

    /// A bake layer could not be uploaded.
    Upload { layer: BakeLayer, attempts: u32 },

    /// A wearable asset did not follow the text format.
    WearableFormat { line: usize, reason: &'static str },

    /// A bake could not be encoded.
    Image(image::ImageError),

    /// Sending a message failed.
    Session(SessionError),
}

impl fmt::Display for AppearanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "an appearance run is already in progress"),
            Self::Timeout { stage } => write!(f, "timed out during {stage}"),
            Self::NoWearables => write!(f, "no wearables are known"),
            Self::Asset { id, reason } => write!(f, "asset {id} failed: {reason}"),
            Self::Upload { layer, attempts } => {
                write!(f, "upload of {layer:?} bake failed after {attempts} attempts")
            }
            Self::WearableFormat { line, reason } => {
                write!(f, "malformed wearable at line {line}: {reason}")
            }
            Self::Image(err) => write!(f, "image error: {err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppearanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for AppearanceError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

impl From<SessionError> for AppearanceError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}
