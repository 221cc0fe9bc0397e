// File: crates/chart-render-skia/tests/common/mod.rs
// Purpose: Shared deterministic chart fixtures for renderer tests.

#![allow(dead_code)]

use chart_core::{Body, Chart, ChartConfig, RawRecord, Theme, Thresholds, TradeRecord};

pub fn ohlc_chart(body: &Body) -> Chart {
    let mut chart = Chart::mount(ChartConfig::candlestick(&Theme::dashboard()), "candles", body).expect("mount");
    let records: Vec<RawRecord> = (0..12)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.7).sin() * 4.0;
            let up = i % 3 != 1;
            RawRecord::new()
                .with("Date", format!("2024-05-{:02}", i + 1))
                .with("Open", if up { base - 1.0 } else { base + 1.0 })
                .with("High", base + 2.5)
                .with("Low", base - 2.5)
                .with("Close", if up { base + 1.0 } else { base - 1.0 })
                .with("Volume", 1_000 + i * 150)
        })
        .collect();
    chart.set_data(&records, &[]);
    chart
}

pub fn rsi_chart(body: &Body) -> Chart {
    let mut chart =
        Chart::mount(ChartConfig::rsi(&Theme::dashboard(), Thresholds::default()), "rsi", body).expect("mount");
    let records: Vec<RawRecord> = (0..20)
        .map(|i| {
            RawRecord::new()
                .with("Date", format!("2024-05-{:02}", i + 1))
                .with("RSI_Value", 50.0 + 35.0 * (i as f64 / 3.0).sin())
        })
        .collect();
    chart.set_data(&records, &[TradeRecord { timestamp: "2024-05-06".into(), side: "BUY".into() }]);
    chart
}
