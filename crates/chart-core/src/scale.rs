// File: crates/chart-core/src/scale.rs
// Summary: Time (X) and Value (Y) scale transforms fitted to a series extent.

use crate::series::Series;
use crate::types::{Timestamp, Viewport, HOUR_MS};

/// Half-width used to widen a single-date time domain.
pub const TIME_EPSILON_MS: i64 = 12 * HOUR_MS;
/// Half-height used to widen a single-value value domain.
pub const VALUE_EPSILON: f64 = 0.5;

/// Horizontal time scale: linear map from `[t_min, t_max]` to `[0, width]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub t_min: Timestamp,
    pub t_max: Timestamp,
    pub width: f32,
}

impl TimeScale {
    /// Degenerate domains (single date) are widened symmetrically.
    pub fn new(mut t_min: Timestamp, mut t_max: Timestamp, width: f32) -> Self {
        if t_max <= t_min {
            t_min = t_min.saturating_sub(TIME_EPSILON_MS);
            t_max = t_min.saturating_add(2 * TIME_EPSILON_MS);
        }
        Self { t_min, t_max, width }
    }
    // spans in i128 so extreme domains cannot overflow
    fn span(&self) -> f64 {
        (self.t_max as i128 - self.t_min as i128) as f64
    }
    #[inline]
    pub fn to_px(&self, t: Timestamp) -> f32 {
        ((t as i128 - self.t_min as i128) as f64 / self.span() * self.width as f64) as f32
    }
    #[inline]
    pub fn from_px(&self, px: f32) -> Timestamp {
        let offset = (px as f64 / self.width.max(f32::EPSILON) as f64 * self.span()).round() as i128;
        (self.t_min as i128 + offset).clamp(i64::MIN as i128, i64::MAX as i128) as Timestamp
    }
}

/// Vertical value scale mapping data range to [top, bottom] pixels (inverted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, mut vmin: f64, mut vmax: f64) -> Self {
        if (vmax - vmin).abs() < 1e-12 {
            vmin -= VALUE_EPSILON;
            vmax += VALUE_EPSILON;
        }
        Self { top_px, bottom_px, vmin, vmax }
    }
    #[inline]
    pub fn to_px(&self, y: f64) -> f32 {
        let span = self.vmax - self.vmin;
        let h = (self.bottom_px - self.top_px) as f64;
        (self.bottom_px as f64 - (y - self.vmin) / span * h) as f32
    }
    #[inline]
    pub fn from_px(&self, py: f32) -> f64 {
        let span = self.vmax - self.vmin;
        let h = ((self.bottom_px - self.top_px) as f64).max(f64::EPSILON);
        self.vmin + (self.bottom_px - py) as f64 / h * span
    }
}

/// How a chart derives its value domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueDomain {
    /// Data extent: min over `low` fields, max over `high` fields, padded by `pad`.
    Padded {
        low: &'static [&'static str],
        high: &'static [&'static str],
        pad: f64,
    },
    /// Static domain regardless of data (e.g. RSI 0..100).
    Fixed { min: f64, max: f64 },
}

impl ValueDomain {
    /// Resolve against a series; `None` when the series has no usable values.
    pub fn resolve(&self, series: &Series) -> Option<(f64, f64)> {
        match *self {
            ValueDomain::Fixed { min, max } => Some((min, max)),
            ValueDomain::Padded { low, high, pad } => {
                let (lo, hi) = series.value_extent(low, high)?;
                Some(pad_extent(lo, hi, pad))
            }
        }
    }
}

/// `lo * (1 - pad)` / `hi * (1 + pad)`, applied to magnitudes so negative extents widen too.
pub fn pad_extent(lo: f64, hi: f64, pad: f64) -> (f64, f64) {
    (lo - lo.abs() * pad, hi + hi.abs() * pad)
}

/// Time + value scale for one render pass. Immutable once fitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub x: TimeScale,
    pub y: ValueScale,
}

impl Scale {
    /// Fit scales to `series` inside the viewport's plot area. `None` for empty series.
    pub fn fit(series: &Series, viewport: &Viewport, domain: &ValueDomain) -> Option<Self> {
        let (t_min, t_max) = series.date_extent()?;
        let (vmin, vmax) = domain.resolve(series)?;
        Some(Self {
            x: TimeScale::new(t_min, t_max, viewport.inner_width()),
            y: ValueScale::new_linear(0.0, viewport.inner_height(), vmin, vmax),
        })
    }

    #[inline]
    pub fn x_of(&self, t: Timestamp) -> f32 { self.x.to_px(t) }
    #[inline]
    pub fn y_of(&self, v: f64) -> f32 { self.y.to_px(v) }
    #[inline]
    pub fn date_at(&self, px: f32) -> Timestamp { self.x.from_px(px) }
    #[inline]
    pub fn value_at(&self, py: f32) -> f64 { self.y.from_px(py) }

    pub fn inner_width(&self) -> f32 { self.x.width }
    pub fn inner_height(&self) -> f32 { self.y.bottom_px - self.y.top_px }
    pub fn time_domain(&self) -> (Timestamp, Timestamp) { (self.x.t_min, self.x.t_max) }
    pub fn value_domain(&self) -> (f64, f64) { (self.y.vmin, self.y.vmax) }

    /// True when a plot-local x lies within `[0, inner_width]`.
    pub fn x_in_range(&self, px: f32) -> bool {
        px >= 0.0 && px <= self.inner_width()
    }
}

/// Candle/bar body width: shrinks with density, capped at `max_width`.
pub fn band_width(inner_width: f32, count: usize, density: f32, max_width: f32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (inner_width / count as f32 * density).min(max_width)
}
