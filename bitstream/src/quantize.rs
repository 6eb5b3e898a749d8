//! Float quantization used by the object-update and texture-entry formats.

use std::f32::consts::TAU;

const U16_MAX: f32 = 65535.0;
const U8_MAX: f32 = 255.0;
const TE_OFFSET_SCALE: f32 = 32767.0;
const TE_ROTATION_SCALE: f32 = 32768.0;

/// Quantizes `value` from `[lower, upper]` into a `u16`.
#[must_use]
pub fn float_to_u16(value: f32, lower: f32, upper: f32) -> u16 {
    let clamped = value.clamp(lower, upper);
    ((clamped - lower) / (upper - lower) * U16_MAX).round() as u16
}

/// Expands a `u16` back into `[lower, upper]`.
///
/// The raw value that zero quantizes to expands to exactly zero, so objects
/// at rest stay at rest.
#[must_use]
pub fn u16_to_float(raw: u16, lower: f32, upper: f32) -> f32 {
    if lower <= 0.0 && upper >= 0.0 && raw == float_to_u16(0.0, lower, upper) {
        return 0.0;
    }
    lower + (f32::from(raw) / U16_MAX) * (upper - lower)
}

/// Quantizes `value` from `[lower, upper]` into a `u8`.
#[must_use]
pub fn float_to_u8(value: f32, lower: f32, upper: f32) -> u8 {
    let clamped = value.clamp(lower, upper);
    ((clamped - lower) / (upper - lower) * U8_MAX).round() as u8
}

/// Expands a `u8` back into `[lower, upper]`, snapping the zero code to zero.
#[must_use]
pub fn u8_to_float(raw: u8, lower: f32, upper: f32) -> f32 {
    if lower <= 0.0 && upper >= 0.0 && raw == float_to_u8(0.0, lower, upper) {
        return 0.0;
    }
    lower + (f32::from(raw) / U8_MAX) * (upper - lower)
}

/// Packs a texture offset (clamped to `[-1, 1]`) into an `i16`.
#[must_use]
pub fn te_offset_short(offset: f32) -> i16 {
    (offset.clamp(-1.0, 1.0) * TE_OFFSET_SCALE).round() as i16
}

/// Unpacks a texture offset.
#[must_use]
pub fn te_offset_float(raw: i16) -> f32 {
    f32::from(raw) / TE_OFFSET_SCALE
}

/// Packs a texture rotation in radians into an `i16`.
///
/// The angle is first wrapped into `[-π, π]`; a full turn spans 32768 steps.
#[must_use]
pub fn te_rotation_short(rotation: f32) -> i16 {
    let wrapped = rotation - (rotation / TAU).round() * TAU;
    (wrapped / TAU * TE_ROTATION_SCALE).round() as i16
}

/// Unpacks a texture rotation in radians.
#[must_use]
pub fn te_rotation_float(raw: i16) -> f32 {
    f32::from(raw) / TE_ROTATION_SCALE * TAU
}

/// Packs a glow intensity (clamped to `[0, 1]`) into a byte.
#[must_use]
pub fn te_glow_byte(glow: f32) -> u8 {
    (glow.clamp(0.0, 1.0) * U8_MAX).round() as u8
}

/// Unpacks a glow intensity.
#[must_use]
pub fn te_glow_float(raw: u8) -> f32 {
    f32::from(raw) / U8_MAX
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn u16_extremes_hit_domain_bounds() {
        assert_eq!(u16_to_float(0, -256.0, 256.0), -256.0);
        assert_eq!(u16_to_float(u16::MAX, -256.0, 256.0), 256.0);
        assert_eq!(u16_to_float(u16::MAX, -128.0, 384.0), 384.0);
    }

    #[test]
    fn zero_survives_symmetric_domain() {
        let raw = float_to_u16(0.0, -64.0, 64.0);
        assert_eq!(u16_to_float(raw, -64.0, 64.0), 0.0);
        let raw = float_to_u8(0.0, -1.0, 1.0);
        assert_eq!(u8_to_float(raw, -1.0, 1.0), 0.0);
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(float_to_u16(1000.0, -256.0, 256.0), u16::MAX);
        assert_eq!(float_to_u16(-1000.0, -256.0, 256.0), 0);
        assert_eq!(float_to_u8(5.0, -1.0, 1.0), u8::MAX);
    }

    #[test]
    fn te_offset_roundtrip() {
        for v in [-1.0f32, -0.5, 0.0, 0.25, 1.0] {
            let back = te_offset_float(te_offset_short(v));
            assert!((back - v).abs() <= 1.0 / TE_OFFSET_SCALE, "offset {v}");
        }
        assert_eq!(te_offset_short(3.0), 32767);
    }

    #[test]
    fn te_rotation_roundtrip_and_wrap() {
        for v in [-PI * 0.99, -1.0, 0.0, 0.5, PI * 0.99] {
            let back = te_rotation_float(te_rotation_short(v));
            assert!((back - v).abs() <= TAU / TE_ROTATION_SCALE, "rotation {v}");
        }
        let wrapped = te_rotation_float(te_rotation_short(0.5 + TAU));
        assert!((wrapped - 0.5).abs() < 1e-3);
    }

    #[test]
    fn te_glow_roundtrip() {
        assert_eq!(te_glow_byte(1.0), 255);
        assert_eq!(te_glow_byte(-0.2), 0);
        assert!((te_glow_float(te_glow_byte(0.4)) - 0.4).abs() <= 1.0 / 255.0);
    }
}
