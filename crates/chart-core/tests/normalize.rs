// File: crates/chart-core/tests/normalize.rs
// Purpose: Series normalization: key fallbacks, strict numbers, drops and stable date ordering.

use chart_core::series::{fields, normalize, CandleDirection, EQUITY_SERIES, OHLC_SERIES, RSI_SERIES};
use chart_core::time::parse_timestamp;
use chart_core::RawRecord;
use serde_json::{json, Value};

fn rec(v: Value) -> RawRecord {
    serde_json::from_value(v).expect("record")
}

#[test]
fn ohlc_records_come_out_sorted_with_direction() {
    let records = vec![
        rec(json!({"Date": "2024-01-02 00:00:00", "Open": 11.0, "High": 11.5, "Low": 9.0, "Close": 9.5})),
        rec(json!({"Date": "2024-01-01 00:00:00", "Open": 10.0, "High": 12.0, "Low": 8.0, "Close": 11.0})),
    ];
    let s = normalize(&records, &OHLC_SERIES);
    assert_eq!(s.len(), 2);
    let pts = s.points();
    assert!(pts[0].date < pts[1].date);
    assert_eq!(pts[0].candle_direction(), Some(CandleDirection::Bullish));
    assert_eq!(pts[1].candle_direction(), Some(CandleDirection::Bearish));
    assert_eq!(pts[1].get(fields::CLOSE), Some(9.5));
}

#[test]
fn fallback_keys_skip_missing_and_null() {
    let records = vec![
        rec(json!({"date": "2024-01-01", "Open": null, "open": "10.5", "high": 11, "Low": 9, "close": 10})),
    ];
    let s = normalize(&records, &OHLC_SERIES);
    assert_eq!(s.len(), 1);
    assert_eq!(s.points()[0].get(fields::OPEN), Some(10.5));
    assert_eq!(s.points()[0].get(fields::HIGH), Some(11.0));
}

#[test]
fn malformed_records_are_dropped_not_fatal() {
    let records = vec![
        rec(json!({"Date": "not a date", "Value": 1.0})),
        rec(json!({"Date": "2024-01-03", "Value": "12abc"})),
        rec(json!({"Date": "2024-01-04", "Value": true})),
        rec(json!({"Value": 5.0})),
        rec(json!({"Date": "2024-01-05", "Value": "1e3"})),
    ];
    let s = normalize(&records, &EQUITY_SERIES);
    assert_eq!(s.len(), 1);
    assert_eq!(s.points()[0].get(fields::VALUE), Some(1000.0));
}

#[test]
fn duplicate_dates_are_kept_in_input_order() {
    let records = vec![
        rec(json!({"Date": "2024-01-02", "RSI_Value": 1.0})),
        rec(json!({"Date": "2024-01-01", "RSI_Value": 2.0})),
        rec(json!({"Date": "2024-01-02", "RSI_Value": 3.0})),
    ];
    let s = normalize(&records, &RSI_SERIES);
    let values: Vec<f64> = s.points().iter().filter_map(|p| p.get(fields::RSI)).collect();
    assert_eq!(values, vec![2.0, 1.0, 3.0]);
    assert!(s.points().windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn optional_volume_never_drops() {
    let records = vec![
        rec(json!({"Date": "2024-01-01", "Open": 1, "High": 2, "Low": 0.5, "Close": 1.5, "Volume": "abc"})),
        rec(json!({"Date": "2024-01-02", "Open": 1, "High": 2, "Low": 0.5, "Close": 1.5, "volume": 1200})),
    ];
    let s = normalize(&records, &OHLC_SERIES);
    assert_eq!(s.len(), 2);
    assert_eq!(s.points()[0].get(fields::VOLUME), None);
    assert_eq!(s.points()[1].get(fields::VOLUME), Some(1200.0));
    assert!(s.has_field(fields::VOLUME));
}

#[test]
fn empty_input_gives_empty_series() {
    let s = normalize(&[], &OHLC_SERIES);
    assert!(s.is_empty());
    assert_eq!(s.date_extent(), None);
}

#[test]
fn epoch_dates_are_accepted() {
    let ms = parse_timestamp("2024-01-01").expect("date");
    let records = vec![rec(json!({"Date": ms, "Value": 1.0})), rec(json!({"Date": ms / 1000 + 60, "Value": 2.0}))];
    let s = normalize(&records, &EQUITY_SERIES);
    assert_eq!(s.len(), 2);
    assert_eq!(s.points()[0].date, ms);
    assert_eq!(s.points()[1].date, ms + 60_000);
}

#[test]
fn out_of_range_epochs_are_dropped() {
    let ms = parse_timestamp("2024-01-01").expect("date");
    let records = vec![
        rec(json!({"Date": i64::MAX, "Value": 1.0})),
        rec(json!({"Date": i64::MIN, "Value": 1.0})),
        rec(json!({"Date": ms, "Value": 2.0})),
    ];
    let s = normalize(&records, &EQUITY_SERIES);
    assert_eq!(s.len(), 1);
    assert_eq!(s.points()[0].date, ms);
}
