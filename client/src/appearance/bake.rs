//! Cache hashes and compositing of bake layers.

use std::collections::BTreeMap;
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat, Rgba, RgbaImage};
use texture::Color4;
use uuid::Uuid;
use wire::WearableType;

use super::layer::{BakeLayer, TextureSlot};
use super::wearable::WearableRef;
use crate::error::AppearanceResult;

/// Cache-check hash of a layer for the worn outfit.
///
/// Returns `None` when nothing worn contributes to the layer, in which case
/// no cache request is made for it.
#[must_use]
pub fn layer_cache_hash(
    layer: BakeLayer,
    outfit: &BTreeMap<WearableType, WearableRef>,
) -> Option<Uuid> {
    if layer == BakeLayer::Skirt && !outfit.contains_key(&WearableType::Skirt) {
        return None;
    }
    let fold = layer
        .contributing_wearables()
        .iter()
        .filter_map(|kind| outfit.get(kind))
        .fold(0u128, |acc, worn| acc ^ worn.asset_id.as_u128());
    (fold != 0).then(|| Uuid::from_u128(fold ^ layer.hash_salt().as_u128()))
}

/// One texture composited into a layer.
#[derive(Debug, Clone)]
pub struct BakeInput {
    pub slot: TextureSlot,
    pub texture_id: Uuid,
    /// Decoded texture; `None` when the download failed.
    pub image: Option<RgbaImage>,
    /// Alpha masks with their weights in `[0, 1]`.
    pub masks: Vec<(GrayImage, f32)>,
    pub tint: Color4,
}

impl BakeInput {
    #[must_use]
    pub fn new(slot: TextureSlot, texture_id: Uuid, image: Option<RgbaImage>) -> Self {
        Self {
            slot,
            texture_id,
            image,
            masks: Vec::new(),
            tint: Color4::WHITE,
        }
    }
}

fn fit(image: &RgbaImage, size: u32) -> RgbaImage {
    if image.dimensions() == (size, size) {
        image.clone()
    } else {
        imageops::resize(image, size, size, FilterType::Triangle)
    }
}

fn fit_mask(mask: &GrayImage, size: u32) -> GrayImage {
    if mask.dimensions() == (size, size) {
        mask.clone()
    } else {
        imageops::resize(mask, size, size, FilterType::Triangle)
    }
}

fn channel(value: u8) -> f32 {
    f32::from(value) / 255.0
}

fn byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Composites a layer from its inputs, bottom to top in slot order.
///
/// Body layers start opaque white and the skirt and hair layers start
/// transparent. Alpha-slot inputs multiply the layer's alpha instead of
/// painting.
#[must_use]
pub fn composite_layer(layer: BakeLayer, inputs: &[BakeInput]) -> RgbaImage {
    let size = layer.bake_size();
    let base = match layer {
        BakeLayer::Skirt | BakeLayer::Hair => Rgba([0, 0, 0, 0]),
        _ => Rgba([255, 255, 255, 255]),
    };
    let mut out = RgbaImage::from_pixel(size, size, base);

    for slot in layer.source_slots() {
        for input in inputs.iter().filter(|input| input.slot == *slot) {
            let Some(image) = input.image.as_ref() else {
                continue;
            };
            let source = fit(image, size);
            let masks: Vec<(GrayImage, f32)> = input
                .masks
                .iter()
                .map(|(mask, weight)| (fit_mask(mask, size), weight.clamp(0.0, 1.0)))
                .collect();
            let tint = input.tint;

            for (x, y, dst) in out.enumerate_pixels_mut() {
                let src = source.get_pixel(x, y);
                let mut alpha = channel(src[3]) * tint.a;
                for (mask, weight) in &masks {
                    alpha *= 1.0 - weight + weight * channel(mask.get_pixel(x, y)[0]);
                }

                if slot.is_alpha() {
                    dst[3] = byte(channel(dst[3]) * alpha);
                    continue;
                }

                let color = [
                    channel(src[0]) * tint.r,
                    channel(src[1]) * tint.g,
                    channel(src[2]) * tint.b,
                ];
                let dst_alpha = channel(dst[3]);
                let out_alpha = alpha + dst_alpha * (1.0 - alpha);
                for (c, value) in color.iter().enumerate() {
                    let blended = if out_alpha > 0.0 {
                        (value * alpha + channel(dst[c]) * dst_alpha * (1.0 - alpha)) / out_alpha
                    } else {
                        0.0
                    };
                    dst[c] = byte(blended);
                }
                dst[3] = byte(out_alpha);
            }
        }
    }
    out
}

/// Encodes a finished bake for upload.
pub fn encode_bake(image: &RgbaImage) -> AppearanceResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
