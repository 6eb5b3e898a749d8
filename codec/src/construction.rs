//! Path and profile parameters describing a primitive's shape.

use wire::{PCode, PackedShape};

const CUT_QUANTA: f32 = 0.000_02;
const SCALE_QUANTA: f32 = 0.01;
const SHEAR_QUANTA: f32 = 0.01;
const TWIST_QUANTA: f32 = 0.01;
const TAPER_QUANTA: f32 = 0.01;
const REV_QUANTA: f32 = 0.015;
const HOLLOW_QUANTA: f32 = 0.000_02;

/// Unpacked shape parameters of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructionData {
    pub pcode: PCode,
    pub material: u8,
    pub state: u8,
    pub path_curve: u8,
    /// Profile curve in the low nibble, hole type in the high nibble.
    pub profile_curve: u8,
    pub path_begin: f32,
    pub path_end: f32,
    pub path_scale_x: f32,
    pub path_scale_y: f32,
    pub path_shear_x: f32,
    pub path_shear_y: f32,
    pub path_twist: f32,
    pub path_twist_begin: f32,
    pub path_radius_offset: f32,
    pub path_taper_x: f32,
    pub path_taper_y: f32,
    pub path_revolutions: f32,
    pub path_skew: f32,
    pub profile_begin: f32,
    pub profile_end: f32,
    pub profile_hollow: f32,
}

impl Default for ConstructionData {
    fn default() -> Self {
        Self::unpack(&PackedShape::default(), PCode::None, 0, 0)
    }
}

impl ConstructionData {
    /// Unpacks the wire shape parameters.
    #[must_use]
    pub fn unpack(shape: &PackedShape, pcode: PCode, material: u8, state: u8) -> Self {
        Self {
            pcode,
            material,
            state,
            path_curve: shape.path_curve,
            profile_curve: shape.profile_curve,
            path_begin: f32::from(shape.path_begin) * CUT_QUANTA,
            path_end: (50_000.0 - f32::from(shape.path_end)) * CUT_QUANTA,
            path_scale_x: (200.0 - f32::from(shape.path_scale_x)) * SCALE_QUANTA,
            path_scale_y: (200.0 - f32::from(shape.path_scale_y)) * SCALE_QUANTA,
            path_shear_x: f32::from(shape.path_shear_x as i8) * SHEAR_QUANTA,
            path_shear_y: f32::from(shape.path_shear_y as i8) * SHEAR_QUANTA,
            path_twist: f32::from(shape.path_twist) * TWIST_QUANTA,
            path_twist_begin: f32::from(shape.path_twist_begin) * TWIST_QUANTA,
            path_radius_offset: f32::from(shape.path_radius_offset) * TWIST_QUANTA,
            path_taper_x: f32::from(shape.path_taper_x) * TAPER_QUANTA,
            path_taper_y: f32::from(shape.path_taper_y) * TAPER_QUANTA,
            path_revolutions: f32::from(shape.path_revolutions) * REV_QUANTA + 1.0,
            path_skew: f32::from(shape.path_skew) * TWIST_QUANTA,
            profile_begin: f32::from(shape.profile_begin) * CUT_QUANTA,
            profile_end: (50_000.0 - f32::from(shape.profile_end)) * CUT_QUANTA,
            profile_hollow: f32::from(shape.profile_hollow) * HOLLOW_QUANTA,
        }
    }

    /// Packs the parameters back into wire form.
    #[must_use]
    pub fn pack(&self) -> PackedShape {
        let signed = |v: f32, q: f32| (v / q).round().clamp(-128.0, 127.0) as i8;
        PackedShape {
            path_curve: self.path_curve,
            path_begin: (self.path_begin / CUT_QUANTA).round() as u16,
            path_end: (50_000.0 - self.path_end / CUT_QUANTA).round() as u16,
            path_scale_x: (200.0 - self.path_scale_x / SCALE_QUANTA).round() as u8,
            path_scale_y: (200.0 - self.path_scale_y / SCALE_QUANTA).round() as u8,
            path_shear_x: signed(self.path_shear_x, SHEAR_QUANTA) as u8,
            path_shear_y: signed(self.path_shear_y, SHEAR_QUANTA) as u8,
            path_twist: signed(self.path_twist, TWIST_QUANTA),
            path_twist_begin: signed(self.path_twist_begin, TWIST_QUANTA),
            path_radius_offset: signed(self.path_radius_offset, TWIST_QUANTA),
            path_taper_x: signed(self.path_taper_x, TAPER_QUANTA),
            path_taper_y: signed(self.path_taper_y, TAPER_QUANTA),
            path_revolutions: ((self.path_revolutions - 1.0) / REV_QUANTA).round() as u8,
            path_skew: signed(self.path_skew, TWIST_QUANTA),
            profile_curve: self.profile_curve,
            profile_begin: (self.profile_begin / CUT_QUANTA).round() as u16,
            profile_end: (50_000.0 - self.profile_end / CUT_QUANTA).round() as u16,
            profile_hollow: (self.profile_hollow / HOLLOW_QUANTA).round() as u16,
        }
    }

    /// Profile shape, low nibble of `profile_curve`.
    #[must_use]
    pub const fn profile_shape(&self) -> u8 {
        self.profile_curve & 0x0F
    }

    /// Hollow shape, high nibble of `profile_curve`.
    #[must_use]
    pub const fn hole_type(&self) -> u8 {
        self.profile_curve & 0xF0
    }
}
