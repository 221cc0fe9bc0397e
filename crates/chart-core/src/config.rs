// File: crates/chart-core/src/config.rs
// Summary: Per-chart configuration presets (candlestick, equity, RSI, SMA crossover).
// Notes:
// - One engine draws every chart; a `ChartConfig` says which fields, domain, glyphs,
//   overlays and tooltip rows a chart uses.

use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;
use crate::format::FieldFormat;
use crate::overlay::{MarkerValue, Thresholds};
use crate::scale::ValueDomain;
use crate::series::{fields, SeriesSpec, EQUITY_SERIES, OHLC_SERIES, RSI_SERIES, SMA_SERIES};
use crate::theme::{Rgba, Theme};
use crate::time::{LONG_DATE, NUMERIC_DATE, SHORT_DATE, TICK_DATE};
use crate::types::{Viewport, CANDLESTICK_VIEWPORT, EQUITY_VIEWPORT, RSI_VIEWPORT, SMA_VIEWPORT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Candlestick,
    Equity,
    Rsi,
    SmaCrossover,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Candlestick => "candlestick",
            ChartKind::Equity => "equity",
            ChartKind::Rsi => "rsi",
            ChartKind::SmaCrossover => "sma",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for ChartKind {
    type Err = ChartError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candlestick" | "ohlc" => Ok(ChartKind::Candlestick),
            "equity" => Ok(ChartKind::Equity),
            "rsi" => Ok(ChartKind::Rsi),
            "sma" | "sma_crossover" => Ok(ChartKind::SmaCrossover),
            other => Err(ChartError::UnknownKind(other.to_string())),
        }
    }
}

/// Sampling for per-point dots along a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotSampling {
    /// Roughly `n` dots: every `ceil(len / n)`-th point.
    AtMost(usize),
    /// Every `max(1, floor(len / d))`-th point.
    Divisor(usize),
}

impl DotSampling {
    pub fn step(self, len: usize) -> usize {
        match self {
            DotSampling::AtMost(n) => len.div_ceil(n.max(1)).max(1),
            DotSampling::Divisor(d) => (len / d.max(1)).max(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotStyle {
    pub sampling: DotSampling,
    pub radius: f32,
    /// Colour dots by oscillator zone instead of the line colour.
    pub zoned: bool,
}

/// Filled area under a line, fading from `top_alpha` to `bottom_alpha`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaStyle {
    pub top_alpha: f32,
    pub bottom_alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub field: &'static str,
    pub label: &'static str,
    pub color: Rgba,
    /// Horizontal gradient end colour.
    pub color_end: Option<Rgba>,
    pub width: f32,
    pub area: Option<AreaStyle>,
    pub dots: Option<DotStyle>,
}

impl LineStyle {
    pub fn new(field: &'static str, label: &'static str, color: Rgba, width: f32) -> Self {
        Self { field, label, color, color_end: None, width, area: None, dots: None }
    }
    pub fn gradient(mut self, end: Rgba) -> Self { self.color_end = Some(end); self }
    pub fn area(mut self, top_alpha: f32, bottom_alpha: f32) -> Self {
        self.area = Some(AreaStyle { top_alpha, bottom_alpha });
        self
    }
    pub fn dots(mut self, sampling: DotSampling, radius: f32, zoned: bool) -> Self {
        self.dots = Some(DotStyle { sampling, radius, zoned });
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Glyph {
    /// OHLC candles; body width `min(inner_width / n * density, max_width)`.
    Candles { density: f32, max_width: f32 },
    Lines(Vec<LineStyle>),
}

/// Which overlays a chart computes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayConfig {
    pub thresholds: Option<Thresholds>,
    /// Dashed reference line (RSI midline at 50).
    pub midline: Option<f64>,
    /// `(short, long)` fields for crossover detection.
    pub crossovers: Option<(&'static str, &'static str)>,
    /// Value trade markers sit on; `None` disables trade markers.
    pub trade_value: Option<MarkerValue>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipField {
    pub label: &'static str,
    pub value: MarkerValue,
    pub format: FieldFormat,
}

impl TooltipField {
    pub const fn new(label: &'static str, field: &'static str, format: FieldFormat) -> Self {
        Self { label, value: MarkerValue::Field(field), format }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipConfig {
    /// Date pattern for the tooltip title.
    pub date_format: &'static str,
    pub fields: Vec<TooltipField>,
    /// Append a candle change row (`+$x.xx (y.yy%)`).
    pub change: bool,
    /// Append the oscillator zone row.
    pub zone: bool,
    /// Rows for a hovered trade marker.
    pub marker_fields: Vec<TooltipField>,
}

/// Text shown instead of a chart when there is nothing to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub viewport: Viewport,
    pub series: SeriesSpec,
    pub domain: ValueDomain,
    pub glyph: Glyph,
    pub overlays: OverlayConfig,
    pub tooltip: TooltipConfig,
    /// Value the hover focus ring sits on.
    pub focus: MarkerValue,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub x_tick_format: &'static str,
    pub y_tick_format: FieldFormat,
    /// Draw volume bars beneath the plot when the series has volume.
    pub volume: bool,
    pub legend: bool,
    pub placeholder: Placeholder,
    pub theme: Theme,
}

impl ChartConfig {
    pub fn candlestick(theme: &Theme) -> Self {
        Self {
            kind: ChartKind::Candlestick,
            viewport: CANDLESTICK_VIEWPORT,
            series: OHLC_SERIES,
            domain: ValueDomain::Padded { low: &[fields::LOW], high: &[fields::HIGH], pad: 0.02 },
            glyph: Glyph::Candles { density: 0.7, max_width: 15.0 },
            overlays: OverlayConfig::default(),
            tooltip: TooltipConfig {
                date_format: LONG_DATE,
                fields: vec![
                    TooltipField::new("Open", fields::OPEN, FieldFormat::Currency),
                    TooltipField::new("High", fields::HIGH, FieldFormat::Currency),
                    TooltipField::new("Low", fields::LOW, FieldFormat::Currency),
                    TooltipField::new("Close", fields::CLOSE, FieldFormat::Currency),
                ],
                change: true,
                zone: false,
                marker_fields: Vec::new(),
            },
            focus: MarkerValue::Field(fields::CLOSE),
            title: "Price Action",
            x_label: "Date",
            y_label: "Price ($)",
            x_ticks: 8,
            y_ticks: 8,
            x_tick_format: TICK_DATE,
            y_tick_format: FieldFormat::Currency,
            volume: true,
            legend: false,
            placeholder: Placeholder { title: "No OHLC Data Available", detail: "Run a backtest to see the candlestick chart" },
            theme: *theme,
        }
    }

    pub fn equity(theme: &Theme) -> Self {
        let line = LineStyle::new(fields::VALUE, "Portfolio Value", theme.equity_start, 3.0)
            .gradient(theme.equity_end)
            .area(0.4, 0.0)
            .dots(DotSampling::Divisor(20), 3.0, false);
        Self {
            kind: ChartKind::Equity,
            viewport: EQUITY_VIEWPORT,
            series: EQUITY_SERIES,
            domain: ValueDomain::Padded { low: &[fields::VALUE], high: &[fields::VALUE], pad: 0.05 },
            glyph: Glyph::Lines(vec![line]),
            overlays: OverlayConfig::default(),
            tooltip: TooltipConfig {
                date_format: SHORT_DATE,
                fields: vec![TooltipField::new("Value", fields::VALUE, FieldFormat::CurrencyGrouped)],
                change: false,
                zone: false,
                marker_fields: Vec::new(),
            },
            focus: MarkerValue::Field(fields::VALUE),
            title: "Equity Curve",
            x_label: "Date",
            y_label: "Portfolio Value ($)",
            x_ticks: 6,
            y_ticks: 6,
            x_tick_format: TICK_DATE,
            y_tick_format: FieldFormat::CurrencyGrouped,
            volume: false,
            legend: false,
            placeholder: Placeholder { title: "No Equity Data Available", detail: "Run a backtest to see the equity curve" },
            theme: *theme,
        }
    }

    pub fn rsi(theme: &Theme, thresholds: Thresholds) -> Self {
        let line = LineStyle::new(fields::RSI, "RSI", theme.rsi_line, 2.0)
            .area(0.25, 0.0)
            .dots(DotSampling::AtMost(50), 3.0, true);
        Self {
            kind: ChartKind::Rsi,
            viewport: RSI_VIEWPORT,
            series: RSI_SERIES,
            domain: ValueDomain::Fixed { min: 0.0, max: 100.0 },
            glyph: Glyph::Lines(vec![line]),
            overlays: OverlayConfig {
                thresholds: Some(thresholds),
                midline: Some(50.0),
                crossovers: None,
                trade_value: Some(MarkerValue::Field(fields::RSI)),
            },
            tooltip: TooltipConfig {
                date_format: NUMERIC_DATE,
                fields: vec![TooltipField::new("RSI", fields::RSI, FieldFormat::Fixed(2))],
                change: false,
                zone: true,
                marker_fields: vec![TooltipField::new("RSI", fields::RSI, FieldFormat::Fixed(2))],
            },
            focus: MarkerValue::Field(fields::RSI),
            title: "RSI (Relative Strength Index)",
            x_label: "Date",
            y_label: "RSI",
            x_ticks: 6,
            y_ticks: 5,
            x_tick_format: TICK_DATE,
            y_tick_format: FieldFormat::Fixed(0),
            volume: false,
            legend: false,
            placeholder: Placeholder { title: "No RSI Data Available", detail: "Run a backtest to see the RSI indicator" },
            theme: *theme,
        }
    }

    pub fn sma_crossover(theme: &Theme) -> Self {
        let short = LineStyle::new(fields::SHORT_SMA, "Short SMA", theme.sma_short, 3.0).area(0.3, 0.0);
        let long = LineStyle::new(fields::LONG_SMA, "Long SMA", theme.sma_long, 3.0).area(0.3, 0.0);
        let sma_rows = vec![
            TooltipField::new("Short SMA", fields::SHORT_SMA, FieldFormat::Currency),
            TooltipField::new("Long SMA", fields::LONG_SMA, FieldFormat::Currency),
        ];
        let mut marker_fields = sma_rows.clone();
        marker_fields.push(TooltipField {
            label: "Avg SMA",
            value: MarkerValue::Midpoint(fields::SHORT_SMA, fields::LONG_SMA),
            format: FieldFormat::Currency,
        });
        Self {
            kind: ChartKind::SmaCrossover,
            viewport: SMA_VIEWPORT,
            series: SMA_SERIES,
            domain: ValueDomain::Padded {
                low: &[fields::SHORT_SMA, fields::LONG_SMA],
                high: &[fields::SHORT_SMA, fields::LONG_SMA],
                pad: 0.02,
            },
            glyph: Glyph::Lines(vec![short, long]),
            overlays: OverlayConfig {
                thresholds: None,
                midline: None,
                crossovers: Some((fields::SHORT_SMA, fields::LONG_SMA)),
                trade_value: Some(MarkerValue::Midpoint(fields::SHORT_SMA, fields::LONG_SMA)),
            },
            tooltip: TooltipConfig {
                date_format: SHORT_DATE,
                fields: sma_rows,
                change: false,
                zone: false,
                marker_fields,
            },
            focus: MarkerValue::Field(fields::SHORT_SMA),
            title: "SMA Crossover Strategy",
            x_label: "Date",
            y_label: "Price ($)",
            x_ticks: 6,
            y_ticks: 6,
            x_tick_format: TICK_DATE,
            y_tick_format: FieldFormat::Currency,
            volume: false,
            legend: true,
            placeholder: Placeholder { title: "No SMA Data Available", detail: "Run a backtest to see the SMA crossover chart" },
            theme: *theme,
        }
    }

    /// Preset for `kind`; RSI uses default thresholds.
    pub fn for_kind(kind: ChartKind, theme: &Theme) -> Self {
        match kind {
            ChartKind::Candlestick => Self::candlestick(theme),
            ChartKind::Equity => Self::equity(theme),
            ChartKind::Rsi => Self::rsi(theme, Thresholds::default()),
            ChartKind::SmaCrossover => Self::sma_crossover(theme),
        }
    }

    pub fn line_styles(&self) -> &[LineStyle] {
        match &self.glyph {
            Glyph::Lines(lines) => lines,
            Glyph::Candles { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_sampling_steps() {
        assert_eq!(DotSampling::AtMost(50).step(120), 3);
        assert_eq!(DotSampling::AtMost(50).step(10), 1);
        assert_eq!(DotSampling::Divisor(20).step(10), 1);
        assert_eq!(DotSampling::Divisor(20).step(100), 5);
    }

    #[test]
    fn kind_round_trips_through_name() {
        for k in [ChartKind::Candlestick, ChartKind::Equity, ChartKind::Rsi, ChartKind::SmaCrossover] {
            assert_eq!(k.name().parse::<ChartKind>().ok(), Some(k));
        }
        assert!("pie".parse::<ChartKind>().is_err());
    }
}
