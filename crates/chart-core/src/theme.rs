// File: crates/chart-core/src/theme.rs
// Summary: Colour palettes for chart scenes, tooltips and KPI tones.

/// Straight (non-premultiplied) RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    /// `0xRRGGBB`, opaque.
    pub const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Same colour with alpha scaled by `factor` (clamped to [0, 1]).
    pub fn faded(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self { a: (self.a as f32 * f).round() as u8, ..self }
    }
}

/// Semantic colouring for tooltip rows and KPI values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
    Caution,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background_top: Rgba,
    pub background_bottom: Rgba,
    pub grid: Rgba,
    pub axis_line: Rgba,
    pub tick_label: Rgba,
    pub axis_title: Rgba,
    pub title: Rgba,
    pub focus: Rgba,
    pub candle_up: Rgba,
    pub candle_up_deep: Rgba,
    pub candle_down: Rgba,
    pub candle_down_deep: Rgba,
    pub equity_start: Rgba,
    pub equity_end: Rgba,
    pub rsi_line: Rgba,
    pub sma_short: Rgba,
    pub sma_long: Rgba,
    pub buy: Rgba,
    pub sell: Rgba,
    pub overbought: Rgba,
    pub oversold: Rgba,
    pub midline: Rgba,
    pub marker_outline: Rgba,
    pub tooltip_background: Rgba,
    pub tooltip_text: Rgba,
    pub muted: Rgba,
    pub caution: Rgba,
    pub info: Rgba,
}

impl Theme {
    /// Dark navy dashboard palette.
    pub fn dashboard() -> Self {
        Self {
            name: "dashboard",
            background_top: Rgba::hex(0x0a0a14),
            background_bottom: Rgba::hex(0x0d0d1a),
            grid: Rgba::hex(0x333333),
            axis_line: Rgba::hex(0x555566),
            tick_label: Rgba::hex(0xa0a0a0),
            axis_title: Rgba::hex(0x4ecdc4),
            title: Rgba::hex(0xffffff),
            focus: Rgba::hex(0x00e676),
            candle_up: Rgba::hex(0x4ecdc4),
            candle_up_deep: Rgba::hex(0x26a69a),
            candle_down: Rgba::hex(0xff6b6b),
            candle_down_deep: Rgba::hex(0xef5350),
            equity_start: Rgba::hex(0x00e676),
            equity_end: Rgba::hex(0xa5d6a7),
            rsi_line: Rgba::hex(0x3b82f6),
            sma_short: Rgba::hex(0x4ecdc4),
            sma_long: Rgba::hex(0xff6b6b),
            buy: Rgba::hex(0x10b981),
            sell: Rgba::hex(0xef4444),
            overbought: Rgba::hex(0xef4444),
            oversold: Rgba::hex(0x10b981),
            midline: Rgba::hex(0x6b7280),
            marker_outline: Rgba::hex(0xffffff),
            tooltip_background: Rgba::rgba(15, 15, 28, 235),
            tooltip_text: Rgba::hex(0xffffff),
            muted: Rgba::hex(0xa0a0a0),
            caution: Rgba::hex(0xf5c542),
            info: Rgba::hex(0x3b82f6),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background_top: Rgba::hex(0xfafafc),
            background_bottom: Rgba::hex(0xeef0f5),
            grid: Rgba::hex(0xd8d8e0),
            axis_line: Rgba::hex(0x3c3c46),
            tick_label: Rgba::hex(0x505060),
            axis_title: Rgba::hex(0x1f7a74),
            title: Rgba::hex(0x14141e),
            focus: Rgba::hex(0x1e78f0),
            candle_up: Rgba::hex(0x14a05a),
            candle_up_deep: Rgba::hex(0x0e7a44),
            candle_down: Rgba::hex(0xc83c3c),
            candle_down_deep: Rgba::hex(0xa02a2a),
            equity_start: Rgba::hex(0x1b8a4a),
            equity_end: Rgba::hex(0x63b37f),
            rsi_line: Rgba::hex(0x2078c8),
            sma_short: Rgba::hex(0x1f7a74),
            sma_long: Rgba::hex(0xc83c3c),
            buy: Rgba::hex(0x0e9f6e),
            sell: Rgba::hex(0xd63a3a),
            overbought: Rgba::hex(0xd63a3a),
            oversold: Rgba::hex(0x0e9f6e),
            midline: Rgba::hex(0x808090),
            marker_outline: Rgba::hex(0x14141e),
            tooltip_background: Rgba::rgba(255, 255, 255, 240),
            tooltip_text: Rgba::hex(0x14141e),
            muted: Rgba::hex(0x606070),
            caution: Rgba::hex(0xb8860b),
            info: Rgba::hex(0x2078c8),
        }
    }

    pub fn tone(&self, tone: Tone) -> Rgba {
        match tone {
            Tone::Neutral => self.tooltip_text,
            Tone::Positive => self.buy,
            Tone::Negative => self.sell,
            Tone::Caution => self.caution,
            Tone::Info => self.info,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Theme::dashboard() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dashboard(), Theme::light()]
}

/// Find a theme by its `name`, falling back to the dashboard palette.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::dashboard()
}
