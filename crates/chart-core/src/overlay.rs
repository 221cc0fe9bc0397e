// File: crates/chart-core/src/overlay.rs
// Summary: Overlay calculator: threshold bands, SMA crossover events and trade markers.
// Notes:
// - Overlays are derived from one series + scale and are recomputed on every data change.
// - Trade markers live in plot-local pixels; markers outside the x range are excluded.

use std::str::FromStr;

use tracing::debug;

use crate::config::OverlayConfig;
use crate::record::TradeRecord;
use crate::scale::Scale;
use crate::series::{Point, Series};
use crate::time::parse_timestamp;
use crate::types::Timestamp;

/// Overbought/oversold levels of an oscillator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for Thresholds {
    fn default() -> Self { Self { overbought: 70.0, oversold: 30.0 } }
}

impl Thresholds {
    /// Missing levels fall back to 70 / 30.
    pub fn from_options(overbought: Option<f64>, oversold: Option<f64>) -> Self {
        let d = Self::default();
        Self {
            overbought: overbought.unwrap_or(d.overbought),
            oversold: oversold.unwrap_or(d.oversold),
        }
    }

    pub fn zone(&self, value: f64) -> Zone {
        if value > self.overbought {
            Zone::Overbought
        } else if value < self.oversold {
            Zone::Oversold
        } else {
            Zone::Neutral
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Overbought,
    Oversold,
    Neutral,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Zone::Overbought => "Overbought",
            Zone::Oversold => "Oversold",
            Zone::Neutral => "Neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandKind {
    Overbought,
    Oversold,
}

/// Horizontal value band `[lower, upper]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdBand {
    pub kind: BandKind,
    pub lower: f64,
    pub upper: f64,
}

impl ThresholdBand {
    /// `(top_px, bottom_px)` in plot-local pixels.
    pub fn pixel_extent(&self, scale: &Scale) -> (f32, f32) {
        (scale.y_of(self.upper), scale.y_of(self.lower))
    }

    /// The threshold line this band starts at.
    pub fn threshold(&self) -> f64 {
        match self.kind {
            BandKind::Overbought => self.lower,
            BandKind::Oversold => self.upper,
        }
    }
}

/// Overbought band `[overbought, max]` and oversold band `[min, oversold]`.
pub fn threshold_bands(thresholds: &Thresholds, domain: (f64, f64)) -> Vec<ThresholdBand> {
    let (min, max) = domain;
    vec![
        ThresholdBand { kind: BandKind::Overbought, lower: thresholds.overbought, upper: max },
        ThresholdBand { kind: BandKind::Oversold, lower: min, upper: thresholds.oversold },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossDirection {
    Bullish,
    Bearish,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossoverEvent {
    pub date: Timestamp,
    /// Midpoint of the two averages at `date`.
    pub value: f64,
    pub direction: CrossDirection,
}

/// Single pass over adjacent pairs. Points missing either field are skipped.
pub fn detect_crossovers(series: &Series, short: &str, long: &str) -> Vec<CrossoverEvent> {
    let pairs: Vec<(Timestamp, f64, f64)> = series
        .points()
        .iter()
        .filter_map(|p| Some((p.date, p.get(short)?, p.get(long)?)))
        .collect();
    let mut out = Vec::new();
    for w in pairs.windows(2) {
        let (_, ps, pl) = w[0];
        let (date, cs, cl) = w[1];
        let direction = if ps <= pl && cs > cl {
            CrossDirection::Bullish
        } else if ps >= pl && cs < cl {
            CrossDirection::Bearish
        } else {
            continue;
        };
        out.push(CrossoverEvent { date, value: (cs + cl) / 2.0, direction });
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl FromStr for TradeSide {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeEvent {
    pub date: Timestamp,
    pub side: TradeSide,
}

/// Parse the trade log, dropping entries with a bad timestamp or unknown side.
pub fn parse_trades(records: &[TradeRecord]) -> Vec<TradeEvent> {
    records
        .iter()
        .filter_map(|r| {
            let parsed = parse_timestamp(&r.timestamp).zip(r.side.parse::<TradeSide>().ok());
            if parsed.is_none() {
                debug!(timestamp = %r.timestamp, side = %r.side, "dropping trade");
            }
            parsed.map(|(date, side)| TradeEvent { date, side })
        })
        .collect()
}

/// Which value of the anchor point a marker sits on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkerValue {
    Field(&'static str),
    /// Average of two fields (e.g. short and long SMA).
    Midpoint(&'static str, &'static str),
}

impl MarkerValue {
    pub fn of(&self, p: &Point) -> Option<f64> {
        match *self {
            MarkerValue::Field(f) => p.get(f),
            MarkerValue::Midpoint(a, b) => Some((p.get(a)? + p.get(b)?) / 2.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeMarker {
    pub date: Timestamp,
    pub side: TradeSide,
    /// Nearest series point by date.
    pub anchor: Point,
    pub value: f64,
    /// Plot-local pixel position.
    pub x: f32,
    pub y: f32,
}

/// Anchor each trade to its nearest point (linear scan, ties to the earlier point).
pub fn anchor_trades(trades: &[TradeEvent], series: &Series, scale: &Scale, value: MarkerValue) -> Vec<TradeMarker> {
    let mut out = Vec::with_capacity(trades.len());
    for t in trades {
        let Some((_, anchor)) = series.nearest_by_scan(t.date) else { break };
        let Some(v) = value.of(anchor) else { continue };
        let x = scale.x_of(t.date);
        if !scale.x_in_range(x) {
            continue;
        }
        out.push(TradeMarker { date: t.date, side: t.side, anchor: anchor.clone(), value: v, x, y: scale.y_of(v) });
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    Band(ThresholdBand),
    Crossover(CrossoverEvent),
    Trade(TradeMarker),
}

/// All overlays of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlays {
    pub thresholds: Option<Thresholds>,
    pub bands: Vec<ThresholdBand>,
    pub crossovers: Vec<CrossoverEvent>,
    pub trades: Vec<TradeMarker>,
}

impl Overlays {
    pub fn compute(series: &Series, scale: &Scale, config: &OverlayConfig, trades: &[TradeEvent]) -> Self {
        let mut out = Overlays { thresholds: config.thresholds, ..Default::default() };
        if let Some(th) = &config.thresholds {
            out.bands = threshold_bands(th, scale.value_domain());
        }
        if let Some((short, long)) = config.crossovers {
            out.crossovers = detect_crossovers(series, short, long);
        }
        if let Some(value) = config.trade_value {
            out.trades = anchor_trades(trades, series, scale, value);
        }
        out
    }

    pub fn all(&self) -> Vec<Overlay> {
        let bands = self.bands.iter().copied().map(Overlay::Band);
        let cross = self.crossovers.iter().copied().map(Overlay::Crossover);
        let trades = self.trades.iter().cloned().map(Overlay::Trade);
        bands.chain(cross).chain(trades).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty() && self.crossovers.is_empty() && self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_side_is_case_insensitive() {
        assert_eq!("buy".parse::<TradeSide>(), Ok(TradeSide::Buy));
        assert_eq!(" SELL ".parse::<TradeSide>(), Ok(TradeSide::Sell));
        assert!("HOLD".parse::<TradeSide>().is_err());
    }

    #[test]
    fn zones_are_strict() {
        let th = Thresholds::default();
        assert_eq!(th.zone(70.0), Zone::Neutral);
        assert_eq!(th.zone(70.1), Zone::Overbought);
        assert_eq!(th.zone(29.9), Zone::Oversold);
    }
}
