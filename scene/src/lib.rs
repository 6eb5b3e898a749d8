//! Scene state for gridsync: what one simulator has told us about its
//! objects and avatars.
//!
//! [`SimulatorObjectTables`] owns the primitives and avatars of one
//! simulator, keyed by local id. It applies decoded updates, kills with
//! cascading link removal, property merges and the dead-reckoning step.
//! It performs no I/O and holds no locks; the client session wraps it.

mod motion;
mod object;
mod properties;
mod table;

pub use motion::{MotionState, HAVOK_TIMESTEP, MOTION_EPSILON};
pub use object::{TrackedAvatar, TrackedPrimitive};
pub use properties::{ObjectProperties, Permissions};
pub use table::{
    AvatarLookup, KillOutcome, ObjectChange, PropertiesUpdate, SeatChange,
    SimulatorObjectTables,
};
