#![no_main]

use libfuzzer_sys::fuzz_target;
use senml_core::{Format, OutputOptions};

// Every decoder must reject garbage with an error, and whatever decodes must
// encode again in every output format.
fuzz_target!(|data: &[u8]| {
    for format in Format::ALL.into_iter().filter(Format::can_decode) {
        if let Ok(pack) = senml_core::decode(data, format) {
            for output in Format::ALL {
                let _ = senml_core::encode(&pack, output, &OutputOptions::default());
            }
        }
    }
});
