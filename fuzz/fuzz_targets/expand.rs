#![no_main]

use libfuzzer_sys::fuzz_target;
use senml_core::Format;

// A pack that validates must resolve, and resolving it again must be a no-op.
fuzz_target!(|data: &[u8]| {
    let Ok(pack) = senml_core::decode(data, Format::Json) else {
        return;
    };
    if !senml_core::validate(&pack).is_empty() {
        return;
    }

    let once = senml_core::resolve(&pack).expect("valid pack resolves");
    let twice = senml_core::resolve(&once).expect("resolved pack resolves");
    assert_eq!(once, twice);
});
