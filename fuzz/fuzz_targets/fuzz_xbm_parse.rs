#![no_main]

use bitglyph_backend::{parse, serialize};
use bitglyph_spec::GlyphId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(image) = parse(text) {
            assert_eq!(image.rows.len(), image.height);

            // Re-serializing a parsed image must parse back to the same rows.
            if let Some(c) = image.identifier.chars().next() {
                if image.identifier.len() == 1 {
                    let id = GlyphId::new(c);
                    let again = serialize(&id, &image.rows, image.width, image.height);
                    let reparsed = parse(&again).expect("serialized image parses");
                    assert_eq!(reparsed.rows, image.rows);
                }
            }
        }
    }
});
