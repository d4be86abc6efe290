// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution Benchmark
//!
//! Measures:
//! - Cold load of a chain of imports into an empty registry
//! - Cached load of the same file (registry hit, no parse)
//! - Envelope decode of an already-loaded type

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schemaload::definition::{FileBuilder, MessageBuilder, ScalarType};
use schemaload::{AnyCodec, DescriptorBundle, DynamicMessage, SchemaLoader};

/// `f0 <- f1 <- ... <- f{depth-1}`, each file wrapping the previous one.
fn chain_bundle(depth: usize) -> DescriptorBundle {
    let mut files = Vec::with_capacity(depth);
    for i in 0..depth {
        let mut message = MessageBuilder::new(format!("M{}", i))
            .field("id", ScalarType::Uint64)
            .field("name", ScalarType::String);
        let mut builder = FileBuilder::new(format!("f{}.schema", i), "bench");
        if i > 0 {
            message = message.message_field("prev", format!("M{}", i - 1));
            builder = builder.dependency(format!("f{}.schema", i - 1));
        }
        files.push(builder.message(message).build().expect("bench file"));
    }
    DescriptorBundle::from_files(files)
}

fn bench_cold_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_load");
    for depth in [1usize, 8, 32] {
        let bundle = chain_bundle(depth);
        let target = format!("f{}.schema", depth - 1);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let loader = SchemaLoader::new();
                black_box(loader.load_file(&target, &bundle).expect("load"))
            });
        });
    }
    group.finish();
}

fn bench_cached_load(c: &mut Criterion) {
    let bundle = chain_bundle(32);
    let loader = SchemaLoader::new();
    loader.load_file("f31.schema", &bundle).expect("warm");

    c.bench_function("cached_load_depth_32", |b| {
        b.iter(|| black_box(loader.load_file("f31.schema", &bundle).expect("load")));
    });
}

fn bench_envelope_decode(c: &mut Criterion) {
    let bundle = chain_bundle(8);
    let loader = SchemaLoader::new();
    let binding = loader.load_file("f7.schema", &bundle).expect("load");
    let mut msg = DynamicMessage::new(binding.message("bench.M7").expect("M7"));
    msg.set("id", 42u64).expect("id");
    msg.set("name", "bench").expect("name");

    let codec = AnyCodec::new(loader);
    let bytes = codec
        .encode(Some(&msg), "bench.M7")
        .expect("encode")
        .expect("bytes");

    c.bench_function("envelope_decode_depth_8", |b| {
        b.iter(|| black_box(codec.decode_bytes(black_box(&bytes), &bundle).expect("decode")));
    });
}

criterion_group!(
    benches,
    bench_cold_load,
    bench_cached_load,
    bench_envelope_decode
);
criterion_main!(benches);
