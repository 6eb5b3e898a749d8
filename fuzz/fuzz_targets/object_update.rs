#![no_main]

use codec::{decode_compressed_block, decode_terse_block, DecodeLimits, MotionData};
use libfuzzer_sys::fuzz_target;
use wire::{CompressedBlock, TerseBlock};

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::for_testing();
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    match selector % 3 {
        0 => {
            let flags = u32::from(selector);
            let _ = decode_compressed_block(
                &CompressedBlock {
                    update_flags: flags,
                    data: rest.to_vec(),
                },
                &limits,
            );
        }
        1 => {
            let split = rest.len().min(usize::from(selector) / 3);
            let (motion, texture_entry) = rest.split_at(rest.len() - split);
            let _ = decode_terse_block(
                &TerseBlock {
                    data: motion.to_vec(),
                    texture_entry: texture_entry.to_vec(),
                },
                &limits,
            );
        }
        _ => {
            let _ = MotionData::decode(rest);
        }
    }
});
