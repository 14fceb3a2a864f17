//! Benchmarks for the low-level wire readers
//!
//! Tests read performance for:
//! - Varints of increasing width, byte aligned and at a bit offset
//! - Big-endian floats
//! - Zero-terminated strings
//!
//! Platform: Cross-platform (synthetic payloads, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use poppet::test_utils::{PayloadBuilder, encode_varint, shift_bits};
use poppet::{BitCursor, StringLimit, StringLimitPolicy};
use std::hint::black_box;

fn bench_varints(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    for value in [1u64, 300, 1 << 20, u64::from(u32::MAX)] {
        let aligned = encode_varint(value);
        let shifted = shift_bits(&aligned, 3);

        group.bench_with_input(BenchmarkId::new("aligned", value), &aligned, |b, data| {
            b.iter(|| {
                let mut cursor = BitCursor::new(black_box(data));
                black_box(cursor.read_u32().unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("offset_3", value), &shifted, |b, data| {
            b.iter(|| {
                let mut cursor = BitCursor::new(black_box(data));
                cursor.skip_bits(3).unwrap();
                black_box(cursor.read_u32().unwrap())
            })
        });
    }

    group.finish();
}

fn bench_floats(c: &mut Criterion) {
    let data = PayloadBuilder::new().f32s(&[1.5; 64]).build();

    let mut group = c.benchmark_group("f32");
    group.throughput(Throughput::Elements(64));
    group.bench_function("sequential_64", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::new(black_box(&data));
            let mut sum = 0.0f32;
            for _ in 0..64 {
                sum += cursor.read_f32().unwrap();
            }
            black_box(sum)
        })
    });
    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("string");

    for len in [8usize, 40, 512] {
        let data = PayloadBuilder::new().string(&"s".repeat(len)).build();
        let limit = StringLimit { field: "bench", max: 512 };

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            b.iter(|| {
                let mut cursor = BitCursor::new(black_box(data));
                black_box(cursor.read_string(limit, StringLimitPolicy::Enforce).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_varints, bench_floats, bench_strings);
criterion_main!(benches);
