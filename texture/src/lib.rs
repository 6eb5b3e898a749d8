//! Per-face appearance data for gridsync objects.
//!
//! A [`TextureEntry`] holds a fully populated default face plus up to
//! [`MAX_FACES`] sparse overrides. Reads through [`FaceView`] fall back to
//! the default face for every attribute an override does not set.
//!
//! Two encodings are provided:
//!
//! - [`TextureEntry::to_bytes`] / [`TextureEntry::from_bytes`]: the packed
//!   bitfield-delta form carried inside object updates.
//! - [`TextureEntry::to_records`] / [`TextureEntry::from_records`] (and the
//!   serde impls built on them): one [`FaceRecord`] per face.
//!
//! # Example
//!
//! ```
//! use texture::{Color4, TextureEntry, Uuid};
//!
//! let mut entry = TextureEntry::new(Uuid::from_u128(1));
//! entry.create_face(5).unwrap().set_rgba(Color4::new(1.0, 0.0, 0.0, 1.0));
//!
//! let decoded = TextureEntry::from_bytes(&entry.to_bytes()).unwrap();
//! assert_eq!(decoded.face(5).unwrap().rgba(), Color4::new(1.0, 0.0, 0.0, 1.0));
//! assert_eq!(decoded.face(5).unwrap().texture_id(), Uuid::from_u128(1));
//! ```

mod delta;
mod entry;
mod error;
mod face;
mod structured;

pub use entry::{TextureEntry, MAX_FACES};
pub use error::{TextureError, TextureResult};
pub use face::{
    pack_material, pack_media, AttributeMask, Color4, FaceAttributes, FaceView, ResolvedFace,
    BUMP_MASK, FULLBRIGHT_MASK, MEDIA_FLAG_MASK, SHINY_MASK, TEX_GEN_MASK,
};
pub use structured::{FaceRecord, DEFAULT_FACE_NUMBER};
pub use uuid::Uuid;
