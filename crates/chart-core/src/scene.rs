// File: crates/chart-core/src/scene.rs
// Summary: Scene model (layered primitives + reveal timeline) and the pure scene builder.
// Notes:
// - Primitives are in outer viewport pixels and sorted by layer; ids equal their index.
// - Timeline cue `i` belongs to primitive `i`. Delays never decrease along the scene.
// - A scene with a placeholder has zero primitives.

use tracing::trace;

use crate::config::{ChartConfig, Glyph, LineStyle, Placeholder};
use crate::geometry::{bounds, trim_polyline, Pt, RectF};
use crate::grid::{nice_ticks, time_ticks};
use crate::overlay::{BandKind, CrossDirection, Overlays, TradeSide, Zone};
use crate::scale::{band_width, Scale};
use crate::series::{fields, CandleDirection, Series};
use crate::theme::Rgba;
use crate::time::format_timestamp;
use crate::timeline::{stagger_ms, Easing, Effect, Timeline, TimelineBuilder};
use crate::tooltip::Tooltip;
use crate::types::Viewport;

/// Entry delays (ms) per stage of the reveal.
pub mod stage {
    pub const BACKGROUND: u32 = 0;
    pub const GRID: u32 = 0;
    pub const GRID_STAGGER: u32 = 50;
    pub const GRID_SPAN: u32 = 500;
    pub const AXES: u32 = 600;
    pub const AREA: u32 = 800;
    pub const VOLUME_STAGGER: u32 = 20;
    pub const VOLUME_SPAN: u32 = 400;
    pub const LINES: u32 = 1200;
    pub const CANDLE_STAGGER: u32 = 50;
    pub const CANDLE_SPAN: u32 = 1000;
    pub const DOTS: u32 = 2000;
    pub const DOT_STAGGER: u32 = 50;
    pub const DOT_SPAN: u32 = 500;
    pub const CROSSOVERS: u32 = 2500;
    pub const CROSSOVER_STAGGER: u32 = 200;
    pub const CROSSOVER_SPAN: u32 = 500;
    pub const TRADES: u32 = 3000;
    pub const ANNOTATIONS: u32 = 3200;
}

/// Height of the volume strip below the plot.
pub const VOLUME_HEIGHT: f32 = 50.0;
const VOLUME_GAP: f32 = 20.0;
const TRADE_MARKER_SIZE: f32 = 10.0;
const CROSSOVER_RADIUS: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub u32);

/// Drawing (and appearance) order, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Grid,
    Axes,
    Area,
    Line,
    Marker,
    Annotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect { rect: RectF, radius: f32 },
    Segment { from: Pt, to: Pt },
    Polyline { points: Vec<Pt> },
    /// Closed area between `points` and the horizontal line `baseline`.
    Area { points: Vec<Pt>, baseline: f32 },
    Circle { center: Pt, radius: f32 },
    /// Bar spanning `base .. base + extent` vertically.
    Bar { x: f32, width: f32, base: f32, extent: f32 },
    /// Wick `[wick_top, wick_bottom]` plus body `[body_top, body_bottom]`; grows from `baseline`.
    Candle { x: f32, width: f32, wick_top: f32, wick_bottom: f32, body_top: f32, body_bottom: f32, baseline: f32 },
    /// Isoceles triangle pointing up or down.
    Triangle { center: Pt, size: f32, up: bool },
    Text { at: Pt, text: String, size: f32, anchor: TextAnchor, rotation_deg: f32, bold: bool },
}

impl Shape {
    /// Bounding box, used for gradient extents. `None` for text and empty paths.
    pub fn bounds(&self) -> Option<RectF> {
        match self {
            Shape::Rect { rect, .. } => Some(*rect),
            Shape::Segment { from, to } => bounds(&[*from, *to]),
            Shape::Polyline { points } => bounds(points),
            Shape::Area { points, baseline } => {
                let mut r = bounds(points)?;
                r.top = r.top.min(*baseline);
                r.bottom = r.bottom.max(*baseline);
                Some(r)
            }
            Shape::Circle { center, radius } => {
                Some(RectF::from_ltrb(center.x - radius, center.y - radius, center.x + radius, center.y + radius))
            }
            Shape::Bar { x, width, base, extent } => {
                let (a, b) = (*base, base + extent);
                Some(RectF::from_ltrb(x - width / 2.0, a.min(b), x + width / 2.0, a.max(b)))
            }
            Shape::Candle { x, width, wick_top, wick_bottom, .. } => {
                Some(RectF::from_ltrb(x - width / 2.0, *wick_top, x + width / 2.0, *wick_bottom))
            }
            Shape::Triangle { center, size, .. } => {
                Some(RectF::from_ltrb(center.x - size, center.y - size, center.x + size, center.y + size))
            }
            Shape::Text { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Top (0) to bottom (1) of the shape bounds.
    Vertical(Vec<GradientStop>),
    /// Left (0) to right (1) of the shape bounds.
    Horizontal(Vec<GradientStop>),
}

impl Paint {
    pub fn vertical(top: Rgba, bottom: Rgba) -> Self {
        Paint::Vertical(vec![GradientStop { offset: 0.0, color: top }, GradientStop { offset: 1.0, color: bottom }])
    }
    pub fn horizontal(left: Rgba, right: Rgba) -> Self {
        Paint::Horizontal(vec![GradientStop { offset: 0.0, color: left }, GradientStop { offset: 1.0, color: right }])
    }
    /// Representative colour (first stop for gradients).
    pub fn base_color(&self) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Vertical(stops) | Paint::Horizontal(stops) => {
                stops.first().map(|s| s.color).unwrap_or(Rgba::rgba(0, 0, 0, 0))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    /// `(on, off)` dash lengths.
    pub dash: Option<(f32, f32)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub opacity: f32,
}

impl Style {
    pub fn fill(paint: Paint) -> Self { Self { fill: Some(paint), stroke: None, opacity: 1.0 } }
    pub fn stroke(paint: Paint, width: f32) -> Self {
        Self { fill: None, stroke: Some(Stroke { paint, width, dash: None }), opacity: 1.0 }
    }
    pub fn outlined(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = Some(Stroke { paint: Paint::Solid(color), width, dash: None });
        self
    }
    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        if let Some(s) = self.stroke.as_mut() { s.dash = Some((on, off)); }
        self
    }
    pub fn opacity(mut self, opacity: f32) -> Self { self.opacity = opacity; self }
}

/// What a primitive stands for; lets hosts and tests find primitives without geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    GridLine,
    ThresholdLine,
    Midline,
    Axis,
    TickLabel,
    AxisTitle,
    ThresholdLabel,
    Band,
    AreaFill(&'static str),
    Volume,
    Line(&'static str),
    Candle,
    Dot,
    Crossover,
    /// Index into `Overlays::trades`.
    TradeMarker(usize),
    TradeLabel(usize),
    Title,
    Legend,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub layer: Layer,
    pub role: Role,
    pub shape: Shape,
    pub style: Style,
}

/// Every visual primitive of one render pass plus its reveal timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    primitives: Vec<Primitive>,
    timeline: Timeline,
    placeholder: Option<Placeholder>,
}

impl Scene {
    /// "No data" scene: zero primitives and a message.
    pub fn placeholder(viewport: Viewport, placeholder: Placeholder) -> Self {
        Self { viewport, primitives: Vec::new(), timeline: Timeline::default(), placeholder: Some(placeholder) }
    }

    pub fn primitives(&self) -> &[Primitive] { &self.primitives }
    pub fn timeline(&self) -> &Timeline { &self.timeline }
    pub fn placeholder_text(&self) -> Option<&Placeholder> { self.placeholder.as_ref() }
    pub fn is_placeholder(&self) -> bool { self.placeholder.is_some() }
    pub fn len(&self) -> usize { self.primitives.len() }
    pub fn is_empty(&self) -> bool { self.primitives.is_empty() }

    pub fn count_in(&self, layer: Layer) -> usize {
        self.primitives.iter().filter(|p| p.layer == layer).count()
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.role == role)
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0 as usize)
    }

    /// Primitive id of the trade marker at `index` in the overlay list.
    pub fn trade_marker_id(&self, index: usize) -> Option<PrimitiveId> {
        self.with_role(Role::TradeMarker(index)).next().map(|p| p.id)
    }

    /// Sample the timeline. Primitives that have not started yet are left out.
    pub fn frame_at(&self, elapsed_ms: u32) -> Frame<'_> {
        let items = self
            .primitives
            .iter()
            .zip(self.timeline.cues())
            .filter_map(|(p, cue)| {
                let progress = cue.progress_at(elapsed_ms);
                (progress > 0.0).then_some(FrameItem { primitive: p, progress, effect: cue.effect, emphasis: 1.0 })
            })
            .collect();
        Frame {
            viewport: self.viewport,
            elapsed_ms,
            items,
            focus: None,
            tooltips: Vec::new(),
            placeholder: self.placeholder,
        }
    }
}

/// Hover focus indicator in outer pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusRing {
    pub center: Pt,
    pub radius: f32,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameItem<'a> {
    pub primitive: &'a Primitive,
    pub progress: f32,
    pub effect: Effect,
    /// Hover highlight scale for markers (1.0 = none).
    pub emphasis: f32,
}

impl FrameItem<'_> {
    pub fn opacity(&self) -> f32 {
        let base = self.primitive.style.opacity;
        match self.effect {
            Effect::Fade => base * self.progress,
            Effect::Reveal | Effect::Grow => base,
        }
    }

    /// Shape with the entry effect and emphasis applied.
    pub fn resolved_shape(&self) -> Shape {
        let p = self.progress;
        let k = p * self.emphasis;
        match (&self.primitive.shape, self.effect) {
            (Shape::Polyline { points }, Effect::Reveal) => Shape::Polyline { points: trim_polyline(points, p) },
            (Shape::Segment { from, to }, Effect::Reveal) => Shape::Segment { from: *from, to: from.lerp(*to, p) },
            (Shape::Circle { center, radius }, Effect::Grow) => Shape::Circle { center: *center, radius: radius * k },
            (Shape::Triangle { center, size, up }, Effect::Grow) => Shape::Triangle { center: *center, size: size * k, up: *up },
            (Shape::Bar { x, width, base, extent }, Effect::Grow) => {
                Shape::Bar { x: *x, width: *width, base: *base, extent: extent * p }
            }
            (Shape::Candle { x, width, wick_top, wick_bottom, body_top, body_bottom, baseline }, Effect::Grow) => {
                let toward = |y: f32| baseline + (y - baseline) * p;
                Shape::Candle {
                    x: *x,
                    width: *width,
                    wick_top: toward(*wick_top),
                    wick_bottom: toward(*wick_bottom),
                    body_top: toward(*body_top),
                    body_bottom: toward(*body_bottom),
                    baseline: *baseline,
                }
            }
            (shape, _) => shape.clone(),
        }
    }
}

/// One sampled instant of a chart, ready for a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub viewport: Viewport,
    pub elapsed_ms: u32,
    pub items: Vec<FrameItem<'a>>,
    pub focus: Option<FocusRing>,
    pub tooltips: Vec<Tooltip>,
    pub placeholder: Option<Placeholder>,
}

impl Frame<'_> {
    pub fn emphasize(&mut self, id: PrimitiveId, factor: f32) {
        for item in self.items.iter_mut().filter(|i| i.primitive.id == id) {
            item.emphasis = factor;
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CueSpec {
    delay_ms: u32,
    duration_ms: u32,
    effect: Effect,
    easing: Easing,
}

impl CueSpec {
    fn new(delay_ms: u32, duration_ms: u32, effect: Effect, easing: Easing) -> Self {
        Self { delay_ms, duration_ms, effect, easing }
    }
}

struct Pending {
    layer: Layer,
    role: Role,
    shape: Shape,
    style: Style,
    cue: CueSpec,
}

struct SceneBuilder<'a> {
    config: &'a ChartConfig,
    scale: &'a Scale,
    origin: Pt,
    pending: Vec<Pending>,
}

impl<'a> SceneBuilder<'a> {
    fn push(&mut self, layer: Layer, role: Role, shape: Shape, style: Style, cue: CueSpec) {
        self.pending.push(Pending { layer, role, shape, style, cue });
    }

    /// Plot-local to outer pixels.
    fn outer(&self, x: f32, y: f32) -> Pt { Pt::new(self.origin.x + x, self.origin.y + y) }

    fn plot_rect(&self) -> RectF {
        RectF::from_ltwh(self.origin.x, self.origin.y, self.scale.inner_width(), self.scale.inner_height())
    }

    fn finish(mut self) -> Scene {
        // stable: keeps insertion order inside a layer
        self.pending.sort_by_key(|p| p.layer);
        let mut timeline = TimelineBuilder::new();
        let mut primitives = Vec::with_capacity(self.pending.len());
        for (i, p) in self.pending.into_iter().enumerate() {
            let id = PrimitiveId(i as u32);
            timeline.cue(id, p.cue.delay_ms, p.cue.duration_ms, p.cue.effect, p.cue.easing);
            primitives.push(Primitive { id, layer: p.layer, role: p.role, shape: p.shape, style: p.style });
        }
        Scene { viewport: self.config.viewport, primitives, timeline: timeline.build(), placeholder: None }
    }
}

fn staggered(base: u32, index: usize, step: f32) -> u32 {
    base + (index as f32 * step).round() as u32
}

fn text(at: Pt, s: impl Into<String>, size: f32, anchor: TextAnchor) -> Shape {
    Shape::Text { at, text: s.into(), size, anchor, rotation_deg: 0.0, bold: false }
}

/// Build the full scene for one render pass. An empty series yields the
/// config's placeholder scene.
pub fn build_scene(series: &Series, scale: &Scale, overlays: &Overlays, config: &ChartConfig) -> Scene {
    if series.is_empty() {
        return Scene::placeholder(config.viewport, config.placeholder);
    }
    let (ox, oy) = config.viewport.origin();
    let mut b = SceneBuilder { config, scale, origin: Pt::new(ox, oy), pending: Vec::new() };

    background(&mut b);
    grid(&mut b);
    axes(&mut b);
    threshold_overlays(&mut b, overlays);
    match &config.glyph {
        Glyph::Candles { density, max_width } => {
            candles(&mut b, series, *density, *max_width);
            if config.volume && series.has_field(fields::VOLUME) {
                volume(&mut b, series, *density, *max_width);
            }
        }
        Glyph::Lines(lines) => {
            for style in lines {
                line(&mut b, series, style, overlays);
            }
        }
    }
    crossovers(&mut b, overlays);
    trades(&mut b, overlays);
    annotations(&mut b);

    let scene = b.finish();
    trace!(kind = %config.kind, primitives = scene.len(), "built scene");
    scene
}

fn background(b: &mut SceneBuilder<'_>) {
    let vp = b.config.viewport;
    let theme = &b.config.theme;
    b.push(
        Layer::Background,
        Role::Background,
        Shape::Rect { rect: RectF::from_ltwh(0.0, 0.0, vp.width as f32, vp.height as f32), radius: 12.0 },
        Style::fill(Paint::vertical(theme.background_top, theme.background_bottom)),
        CueSpec::new(stage::BACKGROUND, 400, Effect::Fade, Easing::Linear),
    );
}

fn grid(b: &mut SceneBuilder<'_>) {
    let plot = b.plot_rect();
    let (vmin, vmax) = b.scale.value_domain();
    let (tmin, tmax) = b.scale.time_domain();
    let ys: Vec<f32> = nice_ticks(vmin, vmax, b.config.y_ticks).into_iter().map(|v| b.scale.y_of(v)).collect();
    let xs: Vec<f32> = time_ticks(tmin, tmax, b.config.x_ticks).into_iter().map(|t| b.scale.x_of(t)).collect();
    let step = stagger_ms(ys.len() + xs.len(), stage::GRID_STAGGER, stage::GRID_SPAN);
    let color = b.config.theme.grid;
    let segments: Vec<Shape> = ys
        .iter()
        .map(|y| Shape::Segment { from: b.outer(0.0, *y), to: Pt::new(plot.right, b.origin.y + y) })
        .chain(xs.iter().map(|x| Shape::Segment { from: b.outer(*x, plot.height()), to: Pt::new(b.origin.x + x, plot.top) }))
        .collect();
    for (i, shape) in segments.into_iter().enumerate() {
        b.push(
            Layer::Grid,
            Role::GridLine,
            shape,
            Style::stroke(Paint::Solid(color), 1.0).opacity(0.3),
            CueSpec::new(staggered(stage::GRID, i, step), 600, Effect::Reveal, Easing::QuadOut),
        );
    }
}

fn axes(b: &mut SceneBuilder<'_>) {
    let cfg = b.config;
    let theme = cfg.theme;
    let plot = b.plot_rect();
    let fade = CueSpec::new(stage::AXES, 600, Effect::Fade, Easing::Linear);
    let axis_style = Style::stroke(Paint::Solid(theme.axis_line), 1.0);

    b.push(Layer::Axes, Role::Axis, Shape::Segment { from: Pt::new(plot.left, plot.bottom), to: Pt::new(plot.right, plot.bottom) }, axis_style.clone(), fade);
    b.push(Layer::Axes, Role::Axis, Shape::Segment { from: Pt::new(plot.left, plot.top), to: Pt::new(plot.left, plot.bottom) }, axis_style, fade);

    let (tmin, tmax) = b.scale.time_domain();
    for t in time_ticks(tmin, tmax, cfg.x_ticks) {
        let at = Pt::new(b.origin.x + b.scale.x_of(t), plot.bottom + 18.0);
        let label = format_timestamp(t, cfg.x_tick_format);
        b.push(Layer::Axes, Role::TickLabel, text(at, label, 11.0, TextAnchor::Middle), Style::fill(Paint::Solid(theme.tick_label)), fade);
    }
    let (vmin, vmax) = b.scale.value_domain();
    for v in nice_ticks(vmin, vmax, cfg.y_ticks) {
        let at = Pt::new(plot.left - 10.0, b.origin.y + b.scale.y_of(v) + 4.0);
        let label = cfg.y_tick_format.apply(v);
        b.push(Layer::Axes, Role::TickLabel, text(at, label, 11.0, TextAnchor::End), Style::fill(Paint::Solid(theme.tick_label)), fade);
    }

    let vp = cfg.viewport;
    let x_title = Pt::new(plot.left + plot.width() / 2.0, vp.height as f32 - 15.0);
    b.push(Layer::Axes, Role::AxisTitle, text(x_title, cfg.x_label, 13.0, TextAnchor::Middle), Style::fill(Paint::Solid(theme.axis_title)), fade);
    let y_title = Shape::Text {
        at: Pt::new(18.0, plot.top + plot.height() / 2.0),
        text: cfg.y_label.to_string(),
        size: 13.0,
        anchor: TextAnchor::Middle,
        rotation_deg: -90.0,
        bold: false,
    };
    b.push(Layer::Axes, Role::AxisTitle, y_title, Style::fill(Paint::Solid(theme.axis_title)), fade);
}

fn threshold_overlays(b: &mut SceneBuilder<'_>, overlays: &Overlays) {
    let theme = b.config.theme;
    let plot = b.plot_rect();
    for band in &overlays.bands {
        let color = match band.kind {
            BandKind::Overbought => theme.overbought,
            BandKind::Oversold => theme.oversold,
        };
        let (top, bottom) = band.pixel_extent(b.scale);
        let rect = RectF::from_ltrb(plot.left, b.origin.y + top, plot.right, b.origin.y + bottom);
        b.push(
            Layer::Area,
            Role::Band,
            Shape::Rect { rect, radius: 0.0 },
            Style::fill(Paint::Solid(color)).opacity(0.1),
            CueSpec::new(stage::AREA, 1000, Effect::Fade, Easing::Linear),
        );

        let y = b.origin.y + b.scale.y_of(band.threshold());
        b.push(
            Layer::Grid,
            Role::ThresholdLine,
            Shape::Segment { from: Pt::new(plot.left, y), to: Pt::new(plot.right, y) },
            Style::stroke(Paint::Solid(color), 2.0).dashed(5.0, 5.0).opacity(0.8),
            CueSpec::new(stage::GRID, 1000, Effect::Reveal, Easing::QuadInOut),
        );
        let (label, dy) = match band.kind {
            BandKind::Overbought => ("Overbought", -5.0),
            BandKind::Oversold => ("Oversold", 15.0),
        };
        let caption = format!("{label} ({})", band.threshold());
        b.push(
            Layer::Axes,
            Role::ThresholdLabel,
            text(Pt::new(plot.right - 5.0, y + dy), caption, 11.0, TextAnchor::End),
            Style::fill(Paint::Solid(color)),
            CueSpec::new(stage::AXES, 600, Effect::Fade, Easing::Linear),
        );
    }
    if let Some(mid) = b.config.overlays.midline {
        let y = b.origin.y + b.scale.y_of(mid);
        b.push(
            Layer::Grid,
            Role::Midline,
            Shape::Segment { from: Pt::new(plot.left, y), to: Pt::new(plot.right, y) },
            Style::stroke(Paint::Solid(theme.midline), 1.0).dashed(3.0, 3.0).opacity(0.6),
            CueSpec::new(stage::GRID, 1000, Effect::Reveal, Easing::QuadInOut),
        );
    }
}

fn candles(b: &mut SceneBuilder<'_>, series: &Series, density: f32, max_width: f32) {
    let theme = b.config.theme;
    let width = band_width(b.scale.inner_width(), series.len(), density, max_width);
    let baseline = b.plot_rect().bottom;
    let step = stagger_ms(series.len(), stage::CANDLE_STAGGER, stage::CANDLE_SPAN);
    for (i, p) in series.points().iter().enumerate() {
        let (Some(o), Some(h), Some(l), Some(c)) =
            (p.get(fields::OPEN), p.get(fields::HIGH), p.get(fields::LOW), p.get(fields::CLOSE))
        else {
            continue;
        };
        let (oy, scale) = (b.origin.y, *b.scale);
        let y = |v: f64| oy + scale.y_of(v);
        let x = b.origin.x + scale.x_of(p.date);
        let body_top = y(o).min(y(c));
        let body_bottom = y(o).max(y(c)).max(body_top + 1.0);
        let paint = match p.candle_direction() {
            Some(CandleDirection::Bullish) => Paint::vertical(theme.candle_up, theme.candle_up_deep),
            _ => Paint::vertical(theme.candle_down, theme.candle_down_deep),
        };
        let stroke_color = paint.base_color();
        b.push(
            Layer::Line,
            Role::Candle,
            Shape::Candle {
                x,
                width,
                wick_top: y(h),
                wick_bottom: y(l),
                body_top,
                body_bottom,
                baseline,
            },
            Style::fill(paint).outlined(stroke_color, 1.0),
            CueSpec::new(staggered(stage::LINES, i, step), 800, Effect::Grow, Easing::QuadOut),
        );
    }
}

fn volume(b: &mut SceneBuilder<'_>, series: &Series, density: f32, max_width: f32) {
    let Some(max_volume) = series.max_of(fields::VOLUME).filter(|v| *v > 0.0) else { return };
    let theme = b.config.theme;
    let width = band_width(b.scale.inner_width(), series.len(), density, max_width);
    let base = b.plot_rect().bottom + VOLUME_GAP;
    let step = stagger_ms(series.len(), stage::VOLUME_STAGGER, stage::VOLUME_SPAN);
    for (i, p) in series.points().iter().enumerate() {
        let v = p.get(fields::VOLUME).unwrap_or(0.0);
        let color = match p.candle_direction() {
            Some(CandleDirection::Bullish) => theme.candle_up,
            _ => theme.candle_down,
        };
        b.push(
            Layer::Area,
            Role::Volume,
            Shape::Bar { x: b.origin.x + b.scale.x_of(p.date), width, base, extent: (v / max_volume) as f32 * VOLUME_HEIGHT },
            Style::fill(Paint::Solid(color)).opacity(0.3),
            CueSpec::new(staggered(stage::AREA, i, step), 800, Effect::Grow, Easing::QuadOut),
        );
    }
}

fn line(b: &mut SceneBuilder<'_>, series: &Series, style: &LineStyle, overlays: &Overlays) {
    let points: Vec<Pt> = series
        .points()
        .iter()
        .filter_map(|p| Some(b.outer(b.scale.x_of(p.date), b.scale.y_of(p.get(style.field)?))))
        .collect();
    if points.is_empty() {
        return;
    }
    let baseline = b.plot_rect().bottom;
    if let Some(area) = style.area {
        b.push(
            Layer::Area,
            Role::AreaFill(style.field),
            Shape::Area { points: points.clone(), baseline },
            Style::fill(Paint::vertical(style.color.faded(area.top_alpha), style.color.faded(area.bottom_alpha))),
            CueSpec::new(stage::AREA, 1000, Effect::Fade, Easing::Linear),
        );
    }
    let paint = match style.color_end {
        Some(end) => Paint::horizontal(style.color, end),
        None => Paint::Solid(style.color),
    };
    b.push(
        Layer::Line,
        Role::Line(style.field),
        Shape::Polyline { points },
        Style::stroke(paint, style.width),
        CueSpec::new(stage::LINES, 2000, Effect::Reveal, Easing::QuadInOut),
    );

    let Some(dots) = style.dots else { return };
    let theme = b.config.theme;
    let step = dots.sampling.step(series.len());
    let sampled: Vec<_> = series.sample_every(step).filter_map(|(_, p)| Some((p.date, p.get(style.field)?))).collect();
    let stagger = stagger_ms(sampled.len(), stage::DOT_STAGGER, stage::DOT_SPAN);
    for (i, (date, v)) in sampled.into_iter().enumerate() {
        let color = match (dots.zoned, overlays.thresholds) {
            (true, Some(th)) => match th.zone(v) {
                Zone::Overbought => theme.overbought,
                Zone::Oversold => theme.oversold,
                Zone::Neutral => style.color,
            },
            _ => style.color,
        };
        b.push(
            Layer::Marker,
            Role::Dot,
            Shape::Circle { center: b.outer(b.scale.x_of(date), b.scale.y_of(v)), radius: dots.radius },
            Style::fill(Paint::Solid(color)).opacity(0.8),
            CueSpec::new(staggered(stage::DOTS, i, stagger), 400, Effect::Grow, Easing::QuadOut),
        );
    }
}

fn crossovers(b: &mut SceneBuilder<'_>, overlays: &Overlays) {
    let theme = b.config.theme;
    let step = stagger_ms(overlays.crossovers.len(), stage::CROSSOVER_STAGGER, stage::CROSSOVER_SPAN);
    for (i, ev) in overlays.crossovers.iter().enumerate() {
        let color = match ev.direction {
            CrossDirection::Bullish => theme.sma_short,
            CrossDirection::Bearish => theme.sma_long,
        };
        b.push(
            Layer::Marker,
            Role::Crossover,
            Shape::Circle { center: b.outer(b.scale.x_of(ev.date), b.scale.y_of(ev.value)), radius: CROSSOVER_RADIUS },
            Style::fill(Paint::Solid(color)).outlined(theme.marker_outline, 2.0),
            CueSpec::new(staggered(stage::CROSSOVERS, i, step), 500, Effect::Grow, Easing::CubicOut),
        );
    }
}

fn trades(b: &mut SceneBuilder<'_>, overlays: &Overlays) {
    let theme = b.config.theme;
    for (i, m) in overlays.trades.iter().enumerate() {
        let center = b.outer(m.x, m.y);
        let (color, up, dy) = match m.side {
            TradeSide::Buy => (theme.buy, true, -15.0),
            TradeSide::Sell => (theme.sell, false, 20.0),
        };
        b.push(
            Layer::Marker,
            Role::TradeMarker(i),
            Shape::Triangle { center, size: TRADE_MARKER_SIZE, up },
            Style::fill(Paint::Solid(color)).outlined(theme.marker_outline, 2.0),
            CueSpec::new(stage::TRADES, 500, Effect::Grow, Easing::CubicOut),
        );
        let label = Shape::Text {
            at: Pt::new(center.x, center.y + dy),
            text: m.side.label().to_string(),
            size: 11.0,
            anchor: TextAnchor::Middle,
            rotation_deg: 0.0,
            bold: true,
        };
        b.push(Layer::Marker, Role::TradeLabel(i), label, Style::fill(Paint::Solid(color)), CueSpec::new(stage::TRADES, 500, Effect::Fade, Easing::Linear));
    }
}

fn annotations(b: &mut SceneBuilder<'_>) {
    let cfg = b.config;
    let theme = cfg.theme;
    let fade = CueSpec::new(stage::ANNOTATIONS, 600, Effect::Fade, Easing::Linear);
    let title = Shape::Text {
        at: Pt::new(cfg.viewport.width as f32 / 2.0, (cfg.viewport.margins.top as f32 * 0.5).max(12.0) + 6.0),
        text: cfg.title.to_string(),
        size: 18.0,
        anchor: TextAnchor::Middle,
        rotation_deg: 0.0,
        bold: true,
    };
    b.push(Layer::Annotation, Role::Title, title, Style::fill(Paint::Solid(theme.title)), fade);

    if !cfg.legend {
        return;
    }
    let plot = b.plot_rect();
    for (i, style) in cfg.line_styles().iter().enumerate() {
        let y = plot.top + 14.0 + i as f32 * 20.0;
        let x = plot.right - 120.0;
        b.push(
            Layer::Annotation,
            Role::Legend,
            Shape::Segment { from: Pt::new(x, y), to: Pt::new(x + 20.0, y) },
            Style::stroke(Paint::Solid(style.color), 3.0),
            fade,
        );
        b.push(
            Layer::Annotation,
            Role::Legend,
            text(Pt::new(x + 28.0, y + 4.0), style.label, 12.0, TextAnchor::Start),
            Style::fill(Paint::Solid(theme.tick_label)),
            fade,
        );
    }
}
