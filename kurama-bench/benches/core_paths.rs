//! Kurama Benchmark Suite
//!
//! Hot paths exercised on every conversational turn:
//!   record_save_with_growth ....... append into a store that must resize
//!   recall_by_tag_mid_log_1000 .... first-match tag scan
//!   recall_by_type_1000 ........... newest-of-type scan
//!   cleanup_old_1000 .............. age filter + compaction
//!   dispatch_emotion_defaults ..... first-active-match dispatch

use std::sync::Arc;

use chrono::Duration;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use kurama_bench::filled_store;
use kurama_core::config::{RegistryConfig, StoreConfig};
use kurama_core::processor::ProcessorRegistry;
use kurama_core::store::RecordStore;
use kurama_core::types::{ProcessorKind, RecordType, SystemClock};

/// Benchmark: 100 saves starting from the default capacity (several resizes).
fn bench_save(c: &mut Criterion) {
    c.bench_function("record_save_with_growth", |b| {
        b.iter_batched(
            || {
                RecordStore::with_config(&StoreConfig::default(), Arc::new(SystemClock))
                    .expect("default store config is valid")
            },
            |mut store| {
                for i in 0..100 {
                    let _ = store.save(
                        black_box("I feel happy to talk with you today"),
                        black_box("conversation"),
                        RecordType::Conversation,
                        i,
                    );
                }
                store
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: tag and type lookups over 1 000 records.
fn bench_recall(c: &mut Criterion) {
    let (mut store, _clock) = filled_store(1_000);

    c.bench_function("recall_by_tag_mid_log_1000", |b| {
        b.iter(|| {
            black_box(store.recall_by_tag(black_box("fact-500")).is_some());
        });
    });

    c.bench_function("recall_by_type_1000", |b| {
        b.iter(|| {
            black_box(store.recall_by_type(black_box(RecordType::LearnedFact)).is_some());
        });
    });
}

/// Benchmark: expiring the older half of 1 000 records.
fn bench_cleanup(c: &mut Criterion) {
    c.bench_function("cleanup_old_1000", |b| {
        b.iter_batched(
            || filled_store(1_000),
            |(mut store, _clock)| black_box(store.cleanup_old(Duration::seconds(500))),
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: dispatch against the stock processor set.
fn bench_dispatch(c: &mut Criterion) {
    let registry =
        ProcessorRegistry::with_config(&RegistryConfig::default(), Arc::new(SystemClock))
            .expect("stock processors fit");

    c.bench_function("dispatch_emotion_defaults", |b| {
        b.iter(|| {
            black_box(
                registry.dispatch(black_box("why does it hurt so much?"), ProcessorKind::Emotion),
            );
        });
    });
}

criterion_group!(benches, bench_save, bench_recall, bench_cleanup, bench_dispatch);
criterion_main!(benches);
