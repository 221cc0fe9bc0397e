// File: crates/chart-core/benches/normalize_bench.rs
// Summary: Normalization and nearest-point lookup over large raw record sets.

use chart_core::series::{normalize, OHLC_SERIES};
use chart_core::types::DAY_MS;
use chart_core::RawRecord;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// 2024-01-01, well above the seconds/milliseconds epoch cutoff
const BASE_MS: i64 = 1_704_067_200_000;

fn ohlc_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let mid = 100.0 + (i as f64 * 0.01).sin() * 10.0;
            RawRecord::new()
                .with("Date", BASE_MS + i as i64 * DAY_MS)
                .with("Open", mid - 0.5)
                .with("High", mid + 1.0)
                .with("Low", mid - 1.0)
                .with("Close", mid + 0.5)
                .with("Volume", 1_000 + (i % 500) as u64)
        })
        .rev()
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_ohlc");
    for &n in &[1_000usize, 20_000usize] {
        let records = ohlc_records(n);
        group.bench_function(format!("records_{n}"), |b| {
            b.iter(|| black_box(normalize(black_box(&records), &OHLC_SERIES)));
        });
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let series = normalize(&ohlc_records(20_000), &OHLC_SERIES);
    let probe = BASE_MS + 12_345 * DAY_MS + DAY_MS / 3;
    let mut group = c.benchmark_group("nearest_point");
    group.bench_function("bisect", |b| b.iter(|| black_box(series.nearest_by_bisect(black_box(probe)))));
    group.bench_function("scan", |b| b.iter(|| black_box(series.nearest_by_scan(black_box(probe)))));
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_nearest);
criterion_main!(benches);
