// File: crates/chart-core/src/chart.rs
// Summary: Chart instance: owns one render pass (series, scale, overlays, scene), the hover
//          controller and its tooltip layer.
// Notes:
// - `set_data` tears the previous pass down completely before building the next one.
// - Nothing here blocks; hosts pull frames with `frame_at(elapsed_ms)`.

use tracing::{debug, trace};

use crate::config::ChartConfig;
use crate::error::ChartResult;
use crate::interaction::{HoverContext, HoverPhase, HoverState, InteractionController, PointerEvent, FOCUS_RADIUS};
use crate::overlay::{parse_trades, Overlays};
use crate::record::{RawRecord, TradeRecord};
use crate::scale::Scale;
use crate::scene::{build_scene, FocusRing, Frame, Scene};
use crate::series::{normalize, Series};
use crate::tooltip::{Body, TooltipLayer};

/// State derived from one data set. Replaced wholesale on new data.
#[derive(Clone, Debug)]
struct RenderPass {
    series: Series,
    scale: Scale,
    overlays: Overlays,
}

pub struct Chart {
    config: ChartConfig,
    mount: String,
    body: Body,
    layer: Option<TooltipLayer>,
    pass: Option<RenderPass>,
    scene: Scene,
    controller: InteractionController,
    rebuilds: u32,
}

impl Chart {
    /// Attach a chart to `mount`. Starts with the placeholder scene and one tooltip layer.
    pub fn mount(config: ChartConfig, mount: impl Into<String>, body: &Body) -> ChartResult<Self> {
        config.viewport.validate()?;
        let scene = Scene::placeholder(config.viewport, config.placeholder);
        let layer = body.acquire(layer_owner(&config));
        Ok(Self {
            config,
            mount: mount.into(),
            body: body.clone(),
            layer: Some(layer),
            pass: None,
            scene,
            controller: InteractionController::new(),
            rebuilds: 0,
        })
    }

    /// Replace the data: teardown, then normalize -> scale -> overlays -> scene.
    pub fn set_data(&mut self, records: &[RawRecord], trades: &[TradeRecord]) {
        self.teardown();

        let series = normalize(records, &self.config.series);
        let fitted = Scale::fit(&series, &self.config.viewport, &self.config.domain);
        match fitted {
            Some(scale) => {
                let trades = parse_trades(trades);
                let overlays = Overlays::compute(&series, &scale, &self.config.overlays, &trades);
                self.scene = build_scene(&series, &scale, &overlays, &self.config);
                self.pass = Some(RenderPass { series, scale, overlays });
            }
            None => {
                debug!(kind = %self.config.kind, records = records.len(), "no usable data, showing placeholder");
                self.scene = Scene::placeholder(self.config.viewport, self.config.placeholder);
            }
        }
        self.layer = Some(self.body.acquire(layer_owner(&self.config)));
        self.rebuilds += 1;
        trace!(kind = %self.config.kind, rebuild = self.rebuilds, primitives = self.scene.len(), "chart rebuilt");
    }

    fn teardown(&mut self) {
        self.controller.reset();
        // dropping the layer removes it from the body
        self.layer = None;
        self.pass = None;
        self.scene = Scene::placeholder(self.config.viewport, self.config.placeholder);
    }

    /// Feed a pointer event. Ignored while showing a placeholder.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let (Some(pass), Some(layer)) = (&self.pass, &self.layer) else { return };
        let ctx = HoverContext {
            series: &pass.series,
            scale: &pass.scale,
            viewport: &self.config.viewport,
            overlays: &pass.overlays,
            config: &self.config,
        };
        self.controller.handle(event, &ctx, layer);
    }

    /// Sample the scene at `elapsed_ms` with hover affordances applied.
    pub fn frame_at(&self, elapsed_ms: u32) -> Frame<'_> {
        let mut frame = self.scene.frame_at(elapsed_ms);
        let hover = self.controller.state();
        if hover.active {
            frame.focus = hover.screen_position.map(|center| FocusRing {
                center,
                radius: FOCUS_RADIUS,
                color: self.config.theme.focus,
            });
            if let Some(m) = hover.marker {
                if let Some(id) = self.scene.trade_marker_id(m.index) {
                    frame.emphasize(id, m.scale);
                }
            }
        }
        if let Some(layer) = &self.layer {
            frame.tooltips = layer.visible();
        }
        frame
    }

    /// Detach from the mount point, releasing the tooltip layer.
    pub fn unmount(mut self) {
        self.teardown();
        trace!(mount = %self.mount, "chart unmounted");
    }

    pub fn config(&self) -> &ChartConfig { &self.config }
    pub fn mount_point(&self) -> &str { &self.mount }
    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn series(&self) -> Option<&Series> { self.pass.as_ref().map(|p| &p.series) }
    pub fn scale(&self) -> Option<&Scale> { self.pass.as_ref().map(|p| &p.scale) }
    pub fn overlays(&self) -> Option<&Overlays> { self.pass.as_ref().map(|p| &p.overlays) }
    pub fn hover(&self) -> &HoverState { self.controller.state() }
    pub fn phase(&self) -> HoverPhase { self.controller.phase() }
    pub fn tooltip_layer(&self) -> Option<&TooltipLayer> { self.layer.as_ref() }
    pub fn rebuilds(&self) -> u32 { self.rebuilds }
}

fn layer_owner(config: &ChartConfig) -> String {
    format!("{}-tooltip", config.kind.name())
}
