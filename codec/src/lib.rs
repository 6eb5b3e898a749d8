//! Object-update decoding for gridsync.
//!
//! This crate turns the variable-layout payloads of the three object-update
//! messages into typed values:
//!
//! - [`decode_object_block`] for full `ObjectUpdate` blocks
//! - [`decode_terse_block`] for `ImprovedTerseObjectUpdate` blocks
//! - [`decode_compressed_block`] for `ObjectUpdateCompressed` blocks
//!
//! Every decoder works on one block and fails only that block; callers log
//! the error and move on to the next block.
//!
//! # Design Principles
//!
//! - **Layout by length** - Packed motion data is dispatched on its length alone.
//! - **Bounded decoding** - Variable-length fields are checked against [`DecodeLimits`].
//! - **Stateless** - Decoders hold no state between blocks.

mod construction;
mod decode;
mod error;
mod extra_params;
mod motion;
mod name_value;
mod object;

pub use construction::ConstructionData;
pub use decode::{
    decode_compressed_block, decode_object_block, decode_terse_block, encode_terse_block,
    TERSE_AVATAR_LEN, TERSE_LEN,
};
pub use error::{CodecError, CodecResult};
pub use extra_params::{
    kind as extra_param_kind, ExtraParams, FlexibleData, LightData, LightImage, SculptData,
};
pub use motion::{
    Domain, MotionData, MotionLayout, ObjectMovementUpdate, MOTION_WIDE, POSITION_XY_16,
    POSITION_Z_16, ROTATION_COMPONENT, TERSE_ACCELERATION, TERSE_VELOCITY,
};
pub use name_value::{
    NameValue, NameValueClass, NameValueSendTo, NameValueType, NameValues, ATTACH_ITEM_ID,
};
pub use object::{
    DecodedObject, JointInfo, ParticleBlock, SoundInfo, TextureAnimation, PARTICLE_BLOCK_SIZE,
};
pub use wire::DecodeLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = DecodeLimits::default();
        let _ = ExtraParams::default();
        let _ = NameValues::default();
        let _ = MotionLayout::from_len(60);
        let _: CodecResult<()> = Ok(());
    }
}
