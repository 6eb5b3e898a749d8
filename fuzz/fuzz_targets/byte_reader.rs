#![no_main]

use bitstream::{read_face_bitfield, ByteReader};
use libfuzzer_sys::fuzz_target;
use wire::ReadExt;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Input bytes pick a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        let _ = match op {
            0 => reader.read_u8().map(drop),
            1 => reader.read_u32().map(drop),
            2 => read_face_bitfield(&mut reader).map(drop),
            3 => reader.read_cstr().map(drop),
            4 => reader.read_uuid().map(drop),
            5 => reader.read_packed_quat().map(drop),
            _ => reader.read_vec3().map(drop),
        };
    }
});
