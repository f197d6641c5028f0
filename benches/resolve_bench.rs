use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use senmlcat::test_utils::{compact_pack, encoded};
use senmlcat::{Config, Format, Pipeline, SenMLBuilder, SenMLPack};

fn large_pack(records: usize) -> SenMLPack {
    (0..records)
        .fold(
            SenMLBuilder::new()
                .base_name("urn:dev:ow:10e2073a01080063:")
                .base_time(1_276_020_076.0)
                .base_unit("Cel"),
            |builder, i| builder.add_measurement("temp", i as f64 * 0.1, i as f64),
        )
        .build()
}

fn resolve_benchmark(c: &mut Criterion) {
    let small = compact_pack();
    let large = large_pack(1000);

    c.bench_function("resolve_compact", |b| {
        b.iter(|| senml_core::resolve(black_box(&small)).unwrap())
    });
    c.bench_function("resolve_1000_records", |b| {
        b.iter(|| senml_core::resolve(black_box(&large)).unwrap())
    });
}

fn convert_benchmark(c: &mut Criterion) {
    for (input, output) in [
        (Format::Json, Format::Cbor),
        (Format::Cbor, Format::Json),
        (Format::Xml, Format::Csv),
        (Format::MessagePack, Format::LineProtocol),
    ] {
        let raw = encoded(input);
        let pipeline = Pipeline::without_sinks(Config {
            input,
            output,
            expand: true,
            ..Default::default()
        });

        c.bench_function(&format!("convert_{input}_to_{output}"), |b| {
            b.iter(|| pipeline.convert(black_box(&raw)).unwrap())
        });
    }
}

criterion_group!(benches, resolve_benchmark, convert_benchmark);
criterion_main!(benches);
