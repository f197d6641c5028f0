//! Test utilities for building sample packs and inputs
//!
//! Shared by the unit tests and the integration tests under `tests/`.

use senml_core::{Format, OutputOptions, SenMLBuilder, SenMLPack, SenMLRecord};

/// A compact pack using every base field
pub fn compact_pack() -> SenMLPack {
    SenMLBuilder::new()
        .base_name("urn:dev:ow:10e2073a01080063:")
        .base_time(1_276_020_076.0)
        .base_unit("Cel")
        .base_value(20.0)
        .base_sum(100.0)
        .base_version(10)
        .add_measurement("temp", 1.5, 0.0)
        .add_measurement("temp", 2.0, 60.0)
        .add_record(
            SenMLRecord::with_value("humidity", 45.0)
                .with_unit("%RH")
                .with_time(60.0),
        )
        .add_sum("energy", 2.5, 60.0)
        .add_string_value("label", "Machine Room")
        .build()
}

/// [`compact_pack`] encoded in `format`
pub fn encoded(format: Format) -> Vec<u8> {
    senml_core::encode(&compact_pack(), format, &OutputOptions::default())
        .expect("sample pack encodes")
}
