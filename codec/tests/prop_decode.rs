use codec::{decode_compressed_block, decode_object_block, decode_terse_block, DecodeLimits};
use proptest::prelude::*;
use wire::{CompressedBlock, ObjectUpdateBlock, TerseBlock};

proptest! {
    #[test]
    fn prop_compressed_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let block = CompressedBlock { update_flags: 0, data };
        let _ = decode_compressed_block(&block, &DecodeLimits::default());
    }

    #[test]
    fn prop_terse_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..80),
        texture_entry in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let block = TerseBlock { data, texture_entry };
        let _ = decode_terse_block(&block, &DecodeLimits::default());
    }

    #[test]
    fn prop_motion_length_dispatch(len in 0usize..100) {
        let block = ObjectUpdateBlock {
            object_data: vec![0x40; len],
            ..ObjectUpdateBlock::default()
        };
        let result = decode_object_block(&block, &DecodeLimits::default());
        prop_assert_eq!(result.is_ok(), matches!(len, 16 | 32 | 48 | 60 | 76));
    }
}
