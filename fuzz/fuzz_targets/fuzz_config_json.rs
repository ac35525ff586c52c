#![no_main]

use bitglyph_spec::{validate_config, ConversionConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = ConversionConfig::from_json(text) {
            let _ = validate_config(&config);
            let _ = config.characters();
            if let Ok(json) = config.to_json_pretty() {
                let reparsed: ConversionConfig =
                    serde_json::from_str(&json).expect("serialized config parses");
                assert_eq!(reparsed, config);
            }
        }
    }
});
