// Chameleon hash and redaction benchmarks.
//
// Covers parameter generation, hashing, collision generation, and a full
// store-backed redaction (read, collide, verify, write, flush).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chameleon_protocol::crypto::chameleon::{
    chameleon_hash, generate_collision, ChParams, CheckString,
};
use chameleon_protocol::lifecycle::RedactionEngine;
use chameleon_protocol::storage::TxStore;
use chameleon_protocol::transaction::Transaction;

fn bench_params_generation(c: &mut Criterion) {
    c.bench_function("chameleon/params_generate", |b| {
        b.iter(|| ChParams::generate(&mut rand::thread_rng()).unwrap());
    });
}

fn bench_hash(c: &mut Criterion) {
    let params = ChParams::generate(&mut rand::thread_rng()).unwrap();
    let cs = CheckString::random(&mut rand::thread_rng()).unwrap();
    let content = [0x42u8; 32];

    c.bench_function("chameleon/hash", |b| {
        b.iter(|| chameleon_hash(&params, &cs, &content).unwrap());
    });
}

fn bench_collision(c: &mut Criterion) {
    let params = ChParams::generate(&mut rand::thread_rng()).unwrap();
    let cs = CheckString::random(&mut rand::thread_rng()).unwrap();
    let old = [0x01u8; 32];
    let new = [0x02u8; 32];

    c.bench_function("chameleon/generate_collision", |b| {
        b.iter(|| generate_collision(&params, &cs, &old, &new).unwrap());
    });
}

fn bench_redaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("redaction/store_backed");

    for size in [0usize, 256, 4096] {
        let store = TxStore::open_temporary().unwrap();
        let engine = RedactionEngine::new(store.clone());
        let params = ChParams::generate(&mut rand::thread_rng()).unwrap();
        let tx = Transaction::funds_transfer(
            0,
            100,
            1,
            0,
            [1; 32],
            [2; 32],
            CheckString::random(&mut rand::thread_rng()).unwrap(),
            b"seed".to_vec(),
        )
        .unwrap();
        let hash = tx.id(Some(&params)).unwrap();
        store.put(&hash, &tx).unwrap();
        let payload = vec![0xabu8; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| engine.redact(&hash, payload.clone(), &params).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_params_generation,
    bench_hash,
    bench_collision,
    bench_redaction,
);
criterion_main!(benches);
