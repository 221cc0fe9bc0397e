// File: crates/chart-core/benches/scene_bench.rs
// Summary: Full render pass (set_data) and frame sampling for the dashboard chart kinds.

use anyhow::Result;
use chart_core::types::DAY_MS;
use chart_core::{Body, Chart, ChartConfig, PointerEvent, RawRecord, Theme, Thresholds, TradeRecord};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// 2024-01-01, well above the seconds/milliseconds epoch cutoff
const BASE_MS: i64 = 1_704_067_200_000;

fn rsi_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| RawRecord::new().with("Date", BASE_MS + i as i64 * DAY_MS).with("RSI_Value", 50.0 + 40.0 * (i as f64 * 0.05).sin()))
        .collect()
}

fn ohlc_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let mid = 100.0 + (i as f64 * 0.02).cos() * 5.0;
            let up = i % 3 != 0;
            RawRecord::new()
                .with("Date", BASE_MS + i as i64 * DAY_MS)
                .with("Open", if up { mid - 0.4 } else { mid + 0.4 })
                .with("High", mid + 1.2)
                .with("Low", mid - 1.2)
                .with("Close", if up { mid + 0.4 } else { mid - 0.4 })
                .with("Volume", 500 + i as u64)
        })
        .collect()
}

fn trades(n: usize) -> Vec<TradeRecord> {
    (0..n)
        .step_by(25)
        .map(|i| TradeRecord {
            timestamp: chart_core::time::format_timestamp(BASE_MS + i as i64 * DAY_MS, "%Y-%m-%d %H:%M:%S"),
            side: if i % 50 == 0 { "BUY" } else { "SELL" }.to_string(),
        })
        .collect()
}

fn bench_set_data(c: &mut Criterion) {
    let theme = Theme::dashboard();
    let mut group = c.benchmark_group("set_data");
    for &n in &[250usize, 2_500usize] {
        group.bench_function(format!("candlestick_{n}"), |b| {
            let body = Body::new();
            let records = ohlc_records(n);
            b.iter(|| -> Result<()> {
                let mut chart = Chart::mount(ChartConfig::candlestick(&theme), "bench", &body)?;
                chart.set_data(black_box(&records), &[]);
                black_box(chart.scene().len());
                Ok(())
            });
        });
        group.bench_function(format!("rsi_{n}"), |b| {
            let body = Body::new();
            let records = rsi_records(n);
            let log = trades(n);
            b.iter(|| -> Result<()> {
                let mut chart = Chart::mount(ChartConfig::rsi(&theme, Thresholds::default()), "bench", &body)?;
                chart.set_data(black_box(&records), &log);
                black_box(chart.scene().len());
                Ok(())
            });
        });
    }
    group.finish();
}

fn bench_frames(c: &mut Criterion) -> Result<()> {
    let body = Body::new();
    let mut chart = Chart::mount(ChartConfig::rsi(&Theme::dashboard(), Thresholds::default()), "bench", &body)?;
    chart.set_data(&rsi_records(2_500), &trades(2_500));
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: 400.0, y: 120.0 });

    let mut group = c.benchmark_group("frame_at");
    group.bench_function("mid_reveal", |b| b.iter(|| black_box(chart.frame_at(black_box(1_800)).items.len())));
    group.bench_function("settled_hover", |b| b.iter(|| black_box(chart.frame_at(black_box(10_000)).tooltips.len())));
    group.finish();
    Ok(())
}

fn bench_frames_entry(c: &mut Criterion) {
    if let Err(err) = bench_frames(c) {
        eprintln!("frame bench skipped: {err}");
    }
}

criterion_group!(benches, bench_set_data, bench_frames_entry);
criterion_main!(benches);
