//! Avatar appearance: outfit tracking, layer baking and publication.

mod bake;
mod layer;
mod params;
mod pipeline;
mod pool;
mod wearable;

pub use bake::{composite_layer, encode_bake, layer_cache_hash, BakeInput};
pub use layer::{BakeLayer, TextureSlot};
pub use params::{visual_param, VisualParam, VisualParamValues, VISUAL_PARAMS, VISUAL_PARAM_COUNT};
pub use pipeline::{AppearanceManager, AppearanceStage, DEFAULT_AVATAR_TEXTURE};
pub use wearable::{WearableAsset, WearableRef};
