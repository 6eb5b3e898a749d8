#![no_main]

use libfuzzer_sys::fuzz_target;
use texture::TextureEntry;

fuzz_target!(|data: &[u8]| {
    if let Ok(entry) = TextureEntry::from_bytes(data) {
        // Anything that decodes must re-encode to something that decodes.
        let bytes = entry.to_bytes();
        let again = TextureEntry::from_bytes(&bytes).expect("re-encoded entry decodes");
        assert_eq!(again.to_bytes(), bytes);
    }
});
