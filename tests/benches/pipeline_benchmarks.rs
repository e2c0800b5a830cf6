//! # Health-Shield Pipeline Benchmarks
//!
//! | Stage | Operation |
//! |-------|-----------|
//! | hs-02 Validation | three raw fields to `VitalSigns` |
//! | hs-01 Encoder | one Paillier encryption, four-field record |
//! | node-runtime ABI | `submitHealthMetrics` calldata |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use num_traits::One;
use std::time::Duration;

use hs_01_ciphertext_encoder::{encode, seal_record, PublicKey, RecordPlaintext};
use hs_02_vital_validation::{validate, RawVitalSigns};
use node_runtime::adapters::abi::encode_submit_health_metrics;

/// Key over the Mersenne primes `2^p_exp - 1` and `2^q_exp - 1`.
fn key(p_exp: usize, q_exp: usize) -> PublicKey {
    let one = BigUint::one();
    let p = (BigUint::one() << p_exp) - &one;
    let q = (BigUint::one() << q_exp) - &one;
    PublicKey::with_standard_generator(p * q).unwrap()
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("hs-02-validation");
    let valid = RawVitalSigns::new("72", "118", "98");
    let invalid = RawVitalSigns::new("1500", "abc", "");

    group.bench_function("valid", |b| b.iter(|| black_box(validate(&valid))));
    group.bench_function("invalid", |b| b.iter(|| black_box(validate(&invalid))));
    group.finish();
}

fn bench_encoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("hs-01-encoder");
    group.measurement_time(Duration::from_secs(10));

    // 216-bit and 1128-bit moduli
    for (label, key) in [("216", key(127, 89)), ("1128", key(607, 521))] {
        group.bench_with_input(BenchmarkId::new("encode", label), &key, |b, key| {
            b.iter(|| black_box(encode(black_box(98), key).unwrap()))
        });
    }

    let key = key(127, 89);
    let plaintext = RecordPlaintext {
        heart_rate: 72,
        blood_pressure: 118,
        oxygen_level: 98,
        risk_level: 1,
    };
    group.bench_function("seal_record", |b| {
        b.iter(|| black_box(seal_record(&key, &plaintext).unwrap()))
    });
    group.finish();
}

fn bench_calldata(c: &mut Criterion) {
    let key = key(607, 521);
    let record = seal_record(
        &key,
        &RecordPlaintext {
            heart_rate: 72,
            blood_pressure: 118,
            oxygen_level: 98,
            risk_level: 1,
        },
    )
    .unwrap();

    c.bench_function("node-runtime/submit_calldata", |b| {
        b.iter(|| black_box(encode_submit_health_metrics(&record)))
    });
}

criterion_group!(benches, bench_validation, bench_encoder, bench_calldata);
criterion_main!(benches);
