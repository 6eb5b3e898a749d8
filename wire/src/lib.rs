//! Message blocks, identifiers and wire enums for the gridsync protocol.
//!
//! This crate describes the structure of the messages a simulator sends and
//! accepts. It does not interpret variable-layout payloads; that is the job
//! of the `texture` and `codec` crates.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Field order and widths follow the protocol exactly.
//! - **Bounded decoding** - Variable-length fields are checked against [`DecodeLimits`].
//! - **Sum types at the boundary** - Inbound traffic is one [`InboundMessage`] enum.

mod error;
mod ext;
mod flags;
mod kinds;
mod limits;
mod message;

pub use error::{LimitKind, WireError, WireResult};
pub use ext::{unpack_quat, ReadExt, WriteExt};
pub use flags::{CompressedFlags, PrimFlags};
pub use kinds::{JointType, PCode, WearableType};
pub use limits::DecodeLimits;
pub use message::{
    AgentCachedTextureResponseMessage, AgentSetAppearanceMessage, AgentWearablesUpdateMessage,
    CachedTextureBlock, CompressedBlock, CompressedObjectUpdateMessage, InboundMessage,
    KillObjectMessage, ObjectPropertiesBlock, ObjectPropertiesFamilyBlock,
    ObjectPropertiesFamilyMessage, ObjectPropertiesMessage, ObjectUpdateBlock,
    ObjectUpdateMessage, OutboundMessage, PackedShape, RegionData, RegionHandle, TerseBlock,
    TerseObjectUpdateMessage, WearableBlock, TIME_DILATION_SCALE,
};
pub use uuid::Uuid;
