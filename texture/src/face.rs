//! Per-face appearance attributes and default-face resolution.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presence bits for the attributes of a [`FaceAttributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeMask(u16);

impl AttributeMask {
    pub const TEXTURE_ID: u16 = 1 << 0;
    pub const RGBA: u16 = 1 << 1;
    pub const REPEAT_U: u16 = 1 << 2;
    pub const REPEAT_V: u16 = 1 << 3;
    pub const OFFSET_U: u16 = 1 << 4;
    pub const OFFSET_V: u16 = 1 << 5;
    pub const ROTATION: u16 = 1 << 6;
    pub const MATERIAL: u16 = 1 << 7;
    pub const MEDIA: u16 = 1 << 8;
    pub const GLOW: u16 = 1 << 9;
    pub const MATERIAL_ID: u16 = 1 << 10;
    pub const ALL: u16 = (1 << 11) - 1;

    /// An empty mask.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A mask with every attribute present.
    #[must_use]
    pub const fn all() -> Self {
        Self(Self::ALL)
    }

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw & Self::ALL)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, bit: u16) -> bool {
        self.0 & bit == bit
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, bit: u16) {
        self.0 |= bit;
    }

    fn remove(&mut self, bit: u16) {
        self.0 &= !bit;
    }
}

/// A linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[must_use]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Plain byte form used by text and light colors.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::from_array(bytes.map(|b| f32::from(b) / 255.0))
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; 4] {
        self.to_array()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Wire form: each channel stored inverted, `255 - round(c * 255)`.
    #[must_use]
    pub fn to_inverted_bytes(self) -> [u8; 4] {
        self.to_array()
            .map(|c| 255 - (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    #[must_use]
    pub fn from_inverted_bytes(bytes: [u8; 4]) -> Self {
        Self::from_array(bytes.map(|b| f32::from(255 - b) / 255.0))
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Bump mapping mode, low five bits of the material byte.
pub const BUMP_MASK: u8 = 0x1F;
/// Fullbright flag in the material byte.
pub const FULLBRIGHT_MASK: u8 = 0x20;
/// Shininess, top two bits of the material byte.
pub const SHINY_MASK: u8 = 0xC0;
/// Media flag in the media byte.
pub const MEDIA_FLAG_MASK: u8 = 0x01;
/// Texture mapping type in the media byte.
pub const TEX_GEN_MASK: u8 = 0x06;

/// Packs bump, fullbright and shininess into a material byte.
#[must_use]
pub const fn pack_material(bump: u8, fullbright: bool, shiny: u8) -> u8 {
    let fullbright = if fullbright { FULLBRIGHT_MASK } else { 0 };
    (bump & BUMP_MASK) | fullbright | ((shiny & 0x03) << 6)
}

/// Packs the media flag and mapping type into a media byte.
#[must_use]
pub const fn pack_media(media_flag: bool, tex_gen: u8) -> u8 {
    let flag = if media_flag { MEDIA_FLAG_MASK } else { 0 };
    flag | ((tex_gen & 0x03) << 1)
}

/// Appearance attributes of one face.
///
/// Only attributes whose presence bit is set carry a value of their own;
/// everything else resolves from the entry's default face through
/// [`FaceView`].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAttributes {
    present: AttributeMask,
    texture_id: Uuid,
    rgba: Color4,
    repeat_u: f32,
    repeat_v: f32,
    offset_u: f32,
    offset_v: f32,
    rotation: f32,
    material: u8,
    media: u8,
    glow: f32,
    material_id: Uuid,
}

macro_rules! attribute_accessors {
    ($($field:ident, $setter:ident, $bit:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Own `", stringify!($field), "`, if present.")]
            #[must_use]
            pub fn $field(&self) -> Option<$ty> {
                self.present.contains(AttributeMask::$bit).then_some(self.$field)
            }

            #[doc = concat!("Sets `", stringify!($field), "` and marks it present.")]
            pub fn $setter(&mut self, value: $ty) -> &mut Self {
                self.$field = value;
                self.present.insert(AttributeMask::$bit);
                self
            }
        )*
    };
}

impl FaceAttributes {
    /// An override with nothing set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            present: AttributeMask::empty(),
            ..Self::defaults(Uuid::nil())
        }
    }

    /// A fully populated face used as an entry's default face.
    #[must_use]
    pub fn defaults(texture_id: Uuid) -> Self {
        Self {
            present: AttributeMask::all(),
            texture_id,
            rgba: Color4::WHITE,
            repeat_u: 1.0,
            repeat_v: 1.0,
            offset_u: 0.0,
            offset_v: 0.0,
            rotation: 0.0,
            material: 0,
            media: 0,
            glow: 0.0,
            material_id: Uuid::nil(),
        }
    }

    /// Which attributes this face sets itself.
    #[must_use]
    pub const fn present(&self) -> AttributeMask {
        self.present
    }

    /// Unsets an attribute so it resolves from the default face again.
    pub fn clear(&mut self, bit: u16) -> &mut Self {
        self.present.remove(bit);
        self
    }

    attribute_accessors! {
        texture_id, set_texture_id, TEXTURE_ID, Uuid;
        rgba, set_rgba, RGBA, Color4;
        repeat_u, set_repeat_u, REPEAT_U, f32;
        repeat_v, set_repeat_v, REPEAT_V, f32;
        offset_u, set_offset_u, OFFSET_U, f32;
        offset_v, set_offset_v, OFFSET_V, f32;
        rotation, set_rotation, ROTATION, f32;
        material, set_material, MATERIAL, u8;
        media, set_media, MEDIA, u8;
        glow, set_glow, GLOW, f32;
        material_id, set_material_id, MATERIAL_ID, Uuid;
    }
}

impl Default for FaceAttributes {
    fn default() -> Self {
        Self::empty()
    }
}

/// A face as seen through its entry: own values first, then the default face.
#[derive(Debug, Clone, Copy)]
pub struct FaceView<'a> {
    own: Option<&'a FaceAttributes>,
    default: &'a FaceAttributes,
}

macro_rules! resolved_getters {
    ($($field:ident: $ty:ty;)*) => {
        $(
            #[must_use]
            pub fn $field(&self) -> $ty {
                self.own
                    .and_then(FaceAttributes::$field)
                    .unwrap_or(self.default.$field)
            }
        )*
    };
}

impl<'a> FaceView<'a> {
    pub(crate) const fn new(own: Option<&'a FaceAttributes>, default: &'a FaceAttributes) -> Self {
        Self { own, default }
    }

    /// The override backing this view, if one was materialized.
    #[must_use]
    pub const fn own(&self) -> Option<&'a FaceAttributes> {
        self.own
    }

    resolved_getters! {
        texture_id: Uuid;
        rgba: Color4;
        repeat_u: f32;
        repeat_v: f32;
        offset_u: f32;
        offset_v: f32;
        rotation: f32;
        material: u8;
        media: u8;
        glow: f32;
        material_id: Uuid;
    }

    #[must_use]
    pub fn bump(&self) -> u8 {
        self.material() & BUMP_MASK
    }

    #[must_use]
    pub fn fullbright(&self) -> bool {
        self.material() & FULLBRIGHT_MASK != 0
    }

    #[must_use]
    pub fn shiny(&self) -> u8 {
        (self.material() & SHINY_MASK) >> 6
    }

    #[must_use]
    pub fn media_flag(&self) -> bool {
        self.media() & MEDIA_FLAG_MASK != 0
    }

    #[must_use]
    pub fn tex_gen(&self) -> u8 {
        (self.media() & TEX_GEN_MASK) >> 1
    }

    /// Every attribute resolved to a concrete value.
    #[must_use]
    pub fn resolve(&self) -> ResolvedFace {
        ResolvedFace {
            texture_id: self.texture_id(),
            rgba: self.rgba(),
            repeat_u: self.repeat_u(),
            repeat_v: self.repeat_v(),
            offset_u: self.offset_u(),
            offset_v: self.offset_v(),
            rotation: self.rotation(),
            material: self.material(),
            media: self.media(),
            glow: self.glow(),
            material_id: self.material_id(),
        }
    }
}

/// Effective values of one face after default resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFace {
    pub texture_id: Uuid,
    pub rgba: Color4,
    pub repeat_u: f32,
    pub repeat_v: f32,
    pub offset_u: f32,
    pub offset_v: f32,
    pub rotation: f32,
    pub material: u8,
    pub media: u8,
    pub glow: f32,
    pub material_id: Uuid,
}

impl Eq for ResolvedFace {}

/// `-0.0` and `0.0` compare equal, so they must hash equal too.
fn float_bits(value: f32) -> u32 {
    (value + 0.0).to_bits()
}

impl Hash for ResolvedFace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.texture_id.hash(state);
        for c in self.rgba.to_array() {
            float_bits(c).hash(state);
        }
        for v in [
            self.repeat_u,
            self.repeat_v,
            self.offset_u,
            self.offset_v,
            self.rotation,
            self.glow,
        ] {
            float_bits(v).hash(state);
        }
        self.material.hash(state);
        self.media.hash(state);
        self.material_id.hash(state);
    }
}
