//! The per-object texture entry: a default face plus sparse overrides.

use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::error::{TextureError, TextureResult};
use crate::face::{FaceAttributes, FaceView};

/// Number of faces a texture entry can address.
pub const MAX_FACES: usize = 32;

/// Appearance of every face of one object.
///
/// Overrides are materialized only when something is set on them; all other
/// faces read through to the default face. Equality and hashing compare
/// resolved values, so an override that repeats the default is equal to no
/// override at all.
#[derive(Debug, Clone)]
pub struct TextureEntry {
    default_face: FaceAttributes,
    faces: [Option<FaceAttributes>; MAX_FACES],
}

impl TextureEntry {
    /// Creates an entry whose faces all use `default_texture`.
    #[must_use]
    pub fn new(default_texture: Uuid) -> Self {
        Self {
            default_face: FaceAttributes::defaults(default_texture),
            faces: std::array::from_fn(|_| None),
        }
    }

    /// The default face, fully resolved.
    #[must_use]
    pub const fn default_face(&self) -> FaceView<'_> {
        FaceView::new(None, &self.default_face)
    }

    pub fn default_face_mut(&mut self) -> &mut FaceAttributes {
        &mut self.default_face
    }

    /// Returns the override for `index`, materializing an empty one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::NoSuchFace`] if `index >= MAX_FACES`.
    pub fn create_face(&mut self, index: usize) -> TextureResult<&mut FaceAttributes> {
        let slot = self.faces.get_mut(index).ok_or(TextureError::NoSuchFace {
            index: index as i64,
            max: MAX_FACES,
        })?;
        Ok(slot.get_or_insert_with(FaceAttributes::empty))
    }

    /// Returns the face at `index`, resolving unset attributes from the default.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::NoSuchFace`] if `index >= MAX_FACES`.
    pub fn face(&self, index: usize) -> TextureResult<FaceView<'_>> {
        let slot = self.faces.get(index).ok_or(TextureError::NoSuchFace {
            index: index as i64,
            max: MAX_FACES,
        })?;
        Ok(FaceView::new(slot.as_ref(), &self.default_face))
    }

    /// The materialized override at `index`, if any.
    #[must_use]
    pub fn face_override(&self, index: usize) -> Option<&FaceAttributes> {
        self.faces.get(index).and_then(Option::as_ref)
    }

    /// Drops the override at `index`.
    pub fn remove_face(&mut self, index: usize) -> Option<FaceAttributes> {
        self.faces.get_mut(index).and_then(Option::take)
    }

    /// All faces in index order.
    pub fn faces(&self) -> impl Iterator<Item = FaceView<'_>> + '_ {
        self.faces
            .iter()
            .map(|face| FaceView::new(face.as_ref(), &self.default_face))
    }

    /// Materialized overrides with their face index.
    pub fn overrides(&self) -> impl Iterator<Item = (usize, &FaceAttributes)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(index, face)| face.as_ref().map(|face| (index, face)))
    }

    #[must_use]
    pub fn override_count(&self) -> usize {
        self.faces.iter().filter(|face| face.is_some()).count()
    }

    pub(crate) fn face_slot(&mut self, index: usize) -> &mut FaceAttributes {
        self.faces[index].get_or_insert_with(FaceAttributes::empty)
    }

    pub(crate) fn override_slots(&self) -> &[Option<FaceAttributes>; MAX_FACES] {
        &self.faces
    }
}

impl Default for TextureEntry {
    fn default() -> Self {
        Self::new(Uuid::nil())
    }
}

impl PartialEq for TextureEntry {
    fn eq(&self, other: &Self) -> bool {
        self.faces()
            .zip(other.faces())
            .all(|(a, b)| a.resolve() == b.resolve())
    }
}

impl Eq for TextureEntry {}

impl Hash for TextureEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for face in self.faces() {
            face.resolve().hash(state);
        }
    }
}
