//! Performance benchmarks for plume-engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plume_engine::{codec, FeatureRecord, FeatureSetSchema, FeatureValue, Field, NoJitter, TtlPolicy};

fn test_schema() -> FeatureSetSchema {
    FeatureSetSchema::new(
        "driver_stats",
        vec!["driver_id".into(), "zone".into()],
        vec![
            "rating".into(),
            "trips_today".into(),
            "avg_fare".into(),
            "acceptance".into(),
        ],
    )
    .with_max_age(3600)
}

fn test_record() -> FeatureRecord {
    FeatureRecord::new(
        "driver_stats",
        1_700_000_000,
        vec![
            Field::new("driver_id", FeatureValue::String("d-42".into())),
            Field::new("zone", FeatureValue::Int(3)),
            Field::new("rating", FeatureValue::Double(4.8)),
            Field::new("trips_today", FeatureValue::Int(12)),
            Field::new("avg_fare", FeatureValue::Double(17.25)),
        ],
    )
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    let schema = test_schema();
    let record = test_record();

    group.bench_function("encode_key", |b| {
        b.iter(|| codec::encode_key(black_box(&record), black_box(&schema)))
    });

    group.bench_function("encode_value", |b| {
        b.iter(|| codec::encode_value(black_box(&record), black_box(&schema)))
    });

    group.bench_function("encode_pair", |b| {
        b.iter(|| codec::encode(black_box(&record), black_box(&schema)))
    });

    let key_bytes = codec::encode_key(&record, &schema).unwrap();
    group.bench_function("decode_key", |b| {
        b.iter(|| codec::decode_key(black_box(&key_bytes)))
    });

    group.finish();
}

fn bench_ttl(c: &mut Criterion) {
    let mut group = c.benchmark_group("ttl");
    let schema = test_schema();
    let record = test_record();
    let policy = TtlPolicy::new(true, 60);

    group.bench_function("decide", |b| {
        let mut jitter = NoJitter;
        b.iter(|| {
            policy.decide(
                black_box(&record),
                black_box(Some(&schema)),
                black_box(1_700_000_100),
                &mut jitter,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encoding, bench_ttl);
criterion_main!(benches);
