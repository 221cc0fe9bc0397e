// File: crates/chart-core/src/interaction.rs
// Summary: Pointer hover state machine, nearest-point resolution and trade marker hit-testing.
// Notes:
// - Idle <-> Hovering. Moves while Idle are ignored; Leave resets all hover state.
// - Pointer coordinates are outer viewport pixels.

use tracing::trace;

use crate::config::ChartConfig;
use crate::geometry::{clamp, Pt};
use crate::overlay::{Overlays, TradeMarker};
use crate::scale::Scale;
use crate::series::{Point, Series};
use crate::tooltip::{marker_tooltip, point_tooltip, TooltipLayer, TooltipSlot};
use crate::types::Viewport;

/// Pointer distance (px) within which a trade marker counts as hovered.
pub const MARKER_HIT_RADIUS: f32 = 10.0;
/// Scale applied to the hovered trade marker.
pub const MARKER_HIGHLIGHT: f32 = 1.3;
pub const FOCUS_RADIUS: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Enter,
    Move { x: f32, y: f32 },
    Leave,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverPhase {
    #[default]
    Idle,
    Hovering,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerHover {
    /// Index into `Overlays::trades`.
    pub index: usize,
    pub scale: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
    pub active: bool,
    pub index: Option<usize>,
    pub point: Option<Point>,
    /// Outer pixel position of the focus indicator.
    pub screen_position: Option<Pt>,
    pub marker: Option<MarkerHover>,
}

/// Everything a pointer event is resolved against. Read-only.
#[derive(Clone, Copy, Debug)]
pub struct HoverContext<'a> {
    pub series: &'a Series,
    pub scale: &'a Scale,
    pub viewport: &'a Viewport,
    pub overlays: &'a Overlays,
    pub config: &'a ChartConfig,
}

/// Invert a plot-local x to a date and pick the closer of the bracketing points.
pub fn resolve_nearest<'s>(series: &'s Series, scale: &Scale, plot_x: f32) -> Option<(usize, &'s Point)> {
    series.nearest_by_bisect(scale.date_at(plot_x))
}

/// Closest trade marker within `radius` of a plot-local position; ties keep the first.
pub fn hit_test_marker(markers: &[TradeMarker], at: Pt, radius: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, m) in markers.iter().enumerate() {
        let d = at.distance(Pt::new(m.x, m.y));
        if d > radius {
            continue;
        }
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Debug, Default)]
pub struct InteractionController {
    phase: HoverPhase,
    state: HoverState,
}

impl InteractionController {
    pub fn new() -> Self { Self::default() }

    pub fn phase(&self) -> HoverPhase { self.phase }
    pub fn state(&self) -> &HoverState { &self.state }

    /// Back to Idle with an empty hover state.
    pub fn reset(&mut self) {
        self.phase = HoverPhase::Idle;
        self.state = HoverState::default();
    }

    pub fn handle(&mut self, event: PointerEvent, ctx: &HoverContext<'_>, layer: &TooltipLayer) {
        match (self.phase, event) {
            (HoverPhase::Idle, PointerEvent::Enter) => {
                self.phase = HoverPhase::Hovering;
                self.state.active = true;
                trace!(kind = %ctx.config.kind, "hover enter");
            }
            (HoverPhase::Hovering, PointerEvent::Move { x, y }) => self.on_move(x, y, ctx, layer),
            (HoverPhase::Hovering, PointerEvent::Leave) => {
                self.reset();
                layer.hide_all();
                trace!(kind = %ctx.config.kind, "hover leave");
            }
            // Enter while hovering, Move/Leave while idle
            _ => {}
        }
    }

    fn on_move(&mut self, x: f32, y: f32, ctx: &HoverContext<'_>, layer: &TooltipLayer) {
        let (px, py) = ctx.viewport.to_plot(x, y);
        let px = clamp(px, 0.0, ctx.scale.inner_width());

        if let Some((index, point)) = resolve_nearest(ctx.series, ctx.scale, px) {
            let fy = ctx.config.focus.of(point).map_or(py, |v| ctx.scale.y_of(v));
            let (sx, sy) = ctx.viewport.to_outer(ctx.scale.x_of(point.date), fy);
            let anchor = Pt::new(sx, sy);
            layer.show(TooltipSlot::Cursor, point_tooltip(point, ctx.config, anchor));
            self.state.index = Some(index);
            self.state.point = Some(point.clone());
            self.state.screen_position = Some(anchor);
        }

        let hit = hit_test_marker(&ctx.overlays.trades, Pt::new(px, py), MARKER_HIT_RADIUS);
        match hit.and_then(|i| Some((i, ctx.overlays.trades.get(i)?))) {
            Some((index, marker)) => {
                let (mx, my) = ctx.viewport.to_outer(marker.x, marker.y);
                layer.show(TooltipSlot::Marker, marker_tooltip(marker, ctx.config, Pt::new(mx, my)));
                self.state.marker = Some(MarkerHover { index, scale: MARKER_HIGHLIGHT });
            }
            None => {
                layer.hide(TooltipSlot::Marker);
                self.state.marker = None;
            }
        }
    }
}
