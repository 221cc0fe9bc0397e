// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (timestamps, margins, per-chart viewports).

use crate::error::{ChartError, ChartResult};

/// Milliseconds since the Unix epoch, UTC.
pub type Timestamp = i64;

pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(72, 24, 24, 56)
    }
}

/// Outer pixel size of a chart plus the margins around its plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub margins: Insets,
}

impl Viewport {
    pub const fn new(width: u32, height: u32, margins: Insets) -> Self {
        Self { width, height, margins }
    }

    /// Width of the plot area (outer width minus horizontal margins).
    pub fn inner_width(&self) -> f32 {
        self.width.saturating_sub(self.margins.hsum()) as f32
    }

    /// Height of the plot area (outer height minus vertical margins).
    pub fn inner_height(&self) -> f32 {
        self.height.saturating_sub(self.margins.vsum()) as f32
    }

    /// Plot origin in outer coordinates.
    pub fn origin(&self) -> (f32, f32) {
        (self.margins.left as f32, self.margins.top as f32)
    }

    /// Convert an outer (viewport) coordinate into plot-local space.
    pub fn to_plot(&self, x: f32, y: f32) -> (f32, f32) {
        let (ox, oy) = self.origin();
        (x - ox, y - oy)
    }

    /// Convert a plot-local coordinate into outer (viewport) space.
    pub fn to_outer(&self, x: f32, y: f32) -> (f32, f32) {
        let (ox, oy) = self.origin();
        (x + ox, y + oy)
    }

    /// Reject viewports whose margins swallow the whole plot area.
    pub fn validate(&self) -> ChartResult<()> {
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(ChartError::EmptyPlotArea { width: self.width, height: self.height });
        }
        Ok(())
    }
}

/// Candlestick panel: 900x500.
pub const CANDLESTICK_VIEWPORT: Viewport = Viewport::new(900, 500, Insets::new(120, 50, 50, 80));
/// Equity curve panel: 950x400.
pub const EQUITY_VIEWPORT: Viewport = Viewport::new(950, 400, Insets::new(100, 40, 40, 60));
/// RSI indicator panel: 950x300.
pub const RSI_VIEWPORT: Viewport = Viewport::new(950, 300, Insets::new(60, 60, 20, 60));
/// SMA crossover panel: 950x400.
pub const SMA_VIEWPORT: Viewport = Viewport::new(950, 400, Insets::new(120, 50, 50, 80));
