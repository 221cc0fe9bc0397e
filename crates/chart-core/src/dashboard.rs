// File: crates/chart-core/src/dashboard.rs
// Summary: Dashboard composition: KPI cards and chart panels revealed one after another.

use tracing::debug;

use crate::chart::Chart;
use crate::config::{ChartConfig, ChartKind};
use crate::error::ChartResult;
use crate::kpi::{kpi_cards, KpiCard};
use crate::overlay::Thresholds;
use crate::record::BacktestResult;
use crate::scene::Frame;
use crate::theme::Theme;
use crate::tooltip::Body;

/// Time before the first panel appears.
pub const START_DELAY_MS: u32 = 800;

pub enum PanelContent {
    Kpi(Vec<KpiCard>),
    Chart(Box<Chart>),
}

pub struct Panel {
    pub id: &'static str,
    /// Dashboard time at which the panel appears.
    pub reveal_at_ms: u32,
    pub content: PanelContent,
}

impl Panel {
    /// Panel-local elapsed time, `None` before the panel is revealed.
    pub fn local_time(&self, dashboard_ms: u32) -> Option<u32> {
        dashboard_ms.checked_sub(self.reveal_at_ms)
    }

    pub fn chart(&self) -> Option<&Chart> {
        match &self.content {
            PanelContent::Chart(c) => Some(c.as_ref()),
            PanelContent::Kpi(_) => None,
        }
    }

    pub fn chart_mut(&mut self) -> Option<&mut Chart> {
        match &mut self.content {
            PanelContent::Chart(c) => Some(c.as_mut()),
            PanelContent::Kpi(_) => None,
        }
    }

    /// Chart frame at dashboard time `dashboard_ms`.
    pub fn frame_at(&self, dashboard_ms: u32) -> Option<Frame<'_>> {
        let local = self.local_time(dashboard_ms)?;
        Some(self.chart()?.frame_at(local))
    }
}

pub struct Dashboard {
    theme: Theme,
    body: Body,
    panels: Vec<Panel>,
}

impl Dashboard {
    pub fn build(result: &BacktestResult, theme: &Theme, body: &Body) -> ChartResult<Self> {
        let mut dashboard = Self { theme: *theme, body: body.clone(), panels: Vec::new() };
        dashboard.update(result)?;
        Ok(dashboard)
    }

    /// Replace every panel for a new backtest result. Old charts are released first.
    pub fn update(&mut self, result: &BacktestResult) -> ChartResult<()> {
        self.panels.clear();

        let indicator = indicator_config(result, &self.theme);
        let indicator_records = match indicator.kind {
            ChartKind::Rsi => result.rsi().unwrap_or(&[]),
            _ => result.sma_crossover().unwrap_or(&[]),
        };
        let trades = result.trades();

        let mut candles = Chart::mount(ChartConfig::candlestick(&self.theme), "candlestick", &self.body)?;
        candles.set_data(result.ohlc(), trades);
        let mut ind = Chart::mount(indicator, "indicator", &self.body)?;
        ind.set_data(indicator_records, trades);
        let mut equity = Chart::mount(ChartConfig::equity(&self.theme), "equity", &self.body)?;
        equity.set_data(result.equity_curve(), trades);

        let contents = [
            ("kpi", 0, PanelContent::Kpi(kpi_cards(result))),
            ("candlestick", 3000, PanelContent::Chart(Box::new(candles))),
            ("indicator", 2000, PanelContent::Chart(Box::new(ind))),
            ("equity", 2000, PanelContent::Chart(Box::new(equity))),
        ];
        let mut at = START_DELAY_MS;
        for (id, delay, content) in contents {
            self.panels.push(Panel { id, reveal_at_ms: at, content });
            at += delay;
        }
        debug!(panels = self.panels.len(), "dashboard built");
        Ok(())
    }

    pub fn panels(&self) -> &[Panel] { &self.panels }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panel_mut(&mut self, id: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    /// Panels revealed by dashboard time `ms`.
    pub fn visible_at(&self, ms: u32) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(move |p| p.reveal_at_ms <= ms)
    }

    pub fn theme(&self) -> &Theme { &self.theme }
    pub fn body(&self) -> &Body { &self.body }
}

/// RSI when the backtest produced it (even empty), otherwise SMA crossover.
pub fn indicator_config(result: &BacktestResult, theme: &Theme) -> ChartConfig {
    if result.rsi().is_some() {
        let ti = result.technical_indicators.as_ref();
        let thresholds = Thresholds::from_options(
            ti.and_then(|t| t.overbought_threshold),
            ti.and_then(|t| t.oversold_threshold),
        );
        ChartConfig::rsi(theme, thresholds)
    } else {
        ChartConfig::sma_crossover(theme)
    }
}
