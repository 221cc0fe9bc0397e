// File: crates/chart-core/src/series.rs
// Summary: Normalized time-series model and the record normalizer feeding every chart.
// Notes:
// - Records are read through per-field key fallback chains (e.g. `Open` then `open`).
// - Malformed records are dropped, never fatal; the output is stable-sorted by date.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::record::RawRecord;
use crate::time::timestamp_from_value;
use crate::types::Timestamp;

/// Canonical field names used across charts.
pub mod fields {
    pub const OPEN: &str = "open";
    pub const HIGH: &str = "high";
    pub const LOW: &str = "low";
    pub const CLOSE: &str = "close";
    pub const VOLUME: &str = "volume";
    pub const VALUE: &str = "value";
    pub const RSI: &str = "rsi";
    pub const SHORT_SMA: &str = "short_sma";
    pub const LONG_SMA: &str = "long_sma";
}

/// One normalized time step.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub date: Timestamp,
    pub fields: BTreeMap<String, f64>,
}

impl Point {
    pub fn new(date: Timestamp) -> Self {
        Self { date, fields: BTreeMap::new() }
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.fields.get(key).copied()
    }

    /// Candle direction from open/close; `None` when either is missing.
    /// A flat candle counts as bearish.
    pub fn candle_direction(&self) -> Option<CandleDirection> {
        let (o, c) = (self.get(fields::OPEN)?, self.get(fields::CLOSE)?);
        Some(if c > o { CandleDirection::Bullish } else { CandleDirection::Bearish })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandleDirection {
    Bullish,
    Bearish,
}

/// A canonical field and the raw keys tried, in order, to fill it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl FieldSpec {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }
}

/// Which fields a chart extracts from its records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesSpec {
    pub date_keys: &'static [&'static str],
    pub required: &'static [FieldSpec],
    /// Kept when present and numeric; never causes a drop.
    pub optional: &'static [FieldSpec],
}

const DATE_KEYS: &[&str] = &["Date", "date"];

pub const OHLC_SERIES: SeriesSpec = SeriesSpec {
    date_keys: DATE_KEYS,
    required: &[
        FieldSpec::new(fields::OPEN, &["Open", "open"]),
        FieldSpec::new(fields::HIGH, &["High", "high"]),
        FieldSpec::new(fields::LOW, &["Low", "low"]),
        FieldSpec::new(fields::CLOSE, &["Close", "close"]),
    ],
    optional: &[FieldSpec::new(fields::VOLUME, &["Volume", "volume"])],
};

pub const EQUITY_SERIES: SeriesSpec = SeriesSpec {
    date_keys: DATE_KEYS,
    required: &[FieldSpec::new(fields::VALUE, &["Value", "value"])],
    optional: &[],
};

pub const RSI_SERIES: SeriesSpec = SeriesSpec {
    date_keys: DATE_KEYS,
    required: &[FieldSpec::new(fields::RSI, &["RSI_Value", "rsi_value", "RSI", "rsi"])],
    optional: &[],
};

pub const SMA_SERIES: SeriesSpec = SeriesSpec {
    date_keys: DATE_KEYS,
    required: &[
        FieldSpec::new(fields::SHORT_SMA, &["Short_SMA", "short_sma"]),
        FieldSpec::new(fields::LONG_SMA, &["Long_SMA", "long_sma"]),
    ],
    optional: &[],
};

/// Strict numeric coercion: JSON numbers, or strings that parse whole as a finite f64.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Normalize a single record, `None` when it must be dropped.
pub fn normalize_record(record: &RawRecord, spec: &SeriesSpec) -> Option<Point> {
    let date = record.first_of(spec.date_keys).and_then(timestamp_from_value)?;
    let mut point = Point::new(date);
    for f in spec.required {
        let v = record.first_of(f.keys).and_then(coerce_f64)?;
        point.fields.insert(f.name.to_string(), v);
    }
    for f in spec.optional {
        if let Some(v) = record.first_of(f.keys).and_then(coerce_f64) {
            point.fields.insert(f.name.to_string(), v);
        }
    }
    Some(point)
}

/// Normalize records into a date-sorted series, dropping malformed entries.
pub fn normalize(records: &[RawRecord], spec: &SeriesSpec) -> Series {
    let mut points = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for (index, record) in records.iter().enumerate() {
        match normalize_record(record, spec) {
            Some(p) => points.push(p),
            None => {
                dropped += 1;
                debug!(index, "dropping malformed record");
            }
        }
    }
    // stable: duplicate dates keep their input order
    points.sort_by_key(|p| p.date);
    if dropped > 0 {
        debug!(dropped, kept = points.len(), "normalized series with dropped records");
    }
    Series { points }
}

/// Points sorted ascending by date. Duplicate dates are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Build from already-normalized points; sorts them (stable) by date.
    pub fn from_points(mut points: Vec<Point>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[Point] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn get(&self, index: usize) -> Option<&Point> { self.points.get(index) }

    pub fn date_extent(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Min over `low` fields and max over `high` fields across all points.
    pub fn value_extent(&self, low: &[&str], high: &[&str]) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for p in &self.points {
            for v in low.iter().filter_map(|k| p.get(k)) { lo = lo.min(v); }
            for v in high.iter().filter_map(|k| p.get(k)) { hi = hi.max(v); }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    /// True when at least one point carries `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.points.iter().any(|p| p.fields.contains_key(field))
    }

    pub fn max_of(&self, field: &str) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.get(field))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }

    /// Nearest point by absolute date difference via a linear scan.
    /// Ties resolve to the earlier point.
    pub fn nearest_by_scan(&self, ts: Timestamp) -> Option<(usize, &Point)> {
        let mut best: Option<(usize, &Point, u64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.date.abs_diff(ts);
            match best {
                Some((_, _, bd)) if d >= bd => {}
                _ => best = Some((i, p, d)),
            }
        }
        best.map(|(i, p, _)| (i, p))
    }

    /// Nearest point via binary search for the bracketing pair `(before, after)`.
    /// Ties resolve to the earlier point.
    pub fn nearest_by_bisect(&self, ts: Timestamp) -> Option<(usize, &Point)> {
        if self.points.is_empty() {
            return None;
        }
        let i = self.points.partition_point(|p| p.date < ts).max(1);
        let before = &self.points[i - 1];
        match self.points.get(i) {
            Some(after) if ts.saturating_sub(before.date) > after.date.saturating_sub(ts) => Some((i, after)),
            _ => Some((i - 1, before)),
        }
    }

    /// Every `step`-th point starting at the first (`step` of 0 acts as 1).
    pub fn sample_every(&self, step: usize) -> impl Iterator<Item = (usize, &Point)> {
        self.points.iter().enumerate().step_by(step.max(1))
    }
}
