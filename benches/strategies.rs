//! Benchmarks comparing the barrier and bounded strategies
//!
//! This benchmark measures:
//! - Wall-clock cost of each strategy on uneven sleep-based workloads
//! - Scheduling overhead on instantly-ready work items

use batch_await::{run_batched, run_bounded, NoopErrorSink};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Per-item delays in microseconds; one straggler per group of eight.
fn uneven_delays(n: u64) -> Vec<u64> {
    (0..n).map(|i| if i % 8 == 7 { 2_000 } else { 100 }).collect()
}

fn bench_uneven_workload(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("uneven_workload");
    group.sample_size(20);
    let delays = uneven_delays(64);
    let delays = &delays;

    for size in [4usize, 8, 16] {
        group.bench_with_input(BenchmarkId::new("barrier", size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let items = delays.iter().map(|us| {
                    move || async move {
                        tokio::time::sleep(Duration::from_micros(*us)).await;
                        Ok::<_, String>(*us)
                    }
                });
                black_box(run_batched(items, size, NoopErrorSink).await.unwrap())
            })
        });
        group.bench_with_input(BenchmarkId::new("bounded", size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let items = delays.iter().map(|us| {
                    move || async move {
                        tokio::time::sleep(Duration::from_micros(*us)).await;
                        Ok::<_, String>(*us)
                    }
                });
                black_box(run_bounded(items, size, NoopErrorSink).await.unwrap())
            })
        });
    }

    group.finish();
}

fn bench_ready_items(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("ready_items");

    group.bench_function("barrier_1000", |b| {
        b.to_async(&rt).iter(|| async move {
            let items = (0..1000u32).map(|i| move || async move { Ok::<_, String>(i) });
            black_box(run_batched(items, 32, NoopErrorSink).await.unwrap())
        })
    });
    group.bench_function("bounded_1000", |b| {
        b.to_async(&rt).iter(|| async move {
            let items = (0..1000u32).map(|i| move || async move { Ok::<_, String>(i) });
            black_box(run_bounded(items, 32, NoopErrorSink).await.unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_uneven_workload, bench_ready_items);
criterion_main!(benches);
