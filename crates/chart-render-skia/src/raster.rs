// File: crates/chart-render-skia/src/raster.rs
// Summary: Headless frame rendering on Skia CPU raster surfaces (PNG bytes/file, RGBA8 buffers).
// Notes:
// - Frames arrive in outer viewport pixels; `RenderOptions::scale` only changes surface density.
// - Drawing order is the frame's item order (already back to front), then focus ring,
//   placeholder and tooltips on top.

use anyhow::{anyhow, Context, Result};
use skia_safe as skia;
use tracing::debug;

use chart_core::config::Placeholder;
use chart_core::geometry::{Pt, RectF};
use chart_core::scene::{FocusRing, Frame, FrameItem, Paint, Shape, Stroke, TextAnchor};
use chart_core::{Rgba, Theme, Tone, Tooltip, Viewport};

use crate::text::TextShaper;

pub struct RenderOptions {
    /// Solid colour cleared under the scene. `None` leaves the surface transparent
    /// and relies on the scene's own background primitive.
    pub background: Option<Rgba>,
    /// Device pixel ratio; the surface is `viewport * scale` pixels.
    pub scale: f32,
    pub draw_labels: bool,
    pub draw_tooltips: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { background: None, scale: 1.0, draw_labels: true, draw_tooltips: true }
    }
}

pub fn to_color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn with_opacity(c: Rgba, opacity: f32) -> skia::Color {
    let a = (c.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(a, c.r, c.g, c.b)
}

fn sk_rect(r: &RectF) -> skia::Rect {
    skia::Rect::from_ltrb(r.left, r.top, r.right, r.bottom)
}

fn sk_point(p: Pt) -> skia::Point {
    skia::Point::new(p.x, p.y)
}

pub struct SkiaRenderer {
    theme: Theme,
    shaper: TextShaper,
}

impl SkiaRenderer {
    pub fn new(theme: &Theme) -> Self {
        Self { theme: *theme, shaper: TextShaper::new() }
    }

    pub fn theme(&self) -> &Theme { &self.theme }
    pub(crate) fn shaper(&self) -> &TextShaper { &self.shaper }

    /// Render `frame` to PNG bytes (in-memory).
    pub fn render_to_png_bytes(&self, frame: &Frame<'_>, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = self.render_surface(frame, opts)?;
        encode_png(&mut surface)
    }

    /// Render `frame` to a PNG file, creating parent directories as needed.
    pub fn render_to_png(
        &self,
        frame: &Frame<'_>,
        opts: &RenderOptions,
        output_png_path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let bytes = self.render_to_png_bytes(frame, opts)?;
        write_png(output_png_path.as_ref(), &bytes)
    }

    /// Render `frame` to an unpremultiplied RGBA8 buffer: `(pixels, width, height, stride)`.
    pub fn render_to_rgba8(&self, frame: &Frame<'_>, opts: &RenderOptions) -> Result<(Vec<u8>, i32, i32, usize)> {
        let mut surface = self.render_surface(frame, opts)?;
        read_rgba8(&mut surface)
    }

    fn render_surface(&self, frame: &Frame<'_>, opts: &RenderOptions) -> Result<skia::Surface> {
        let mut surface = raster_surface(frame.viewport.width as f32, frame.viewport.height as f32, opts.scale)?;
        let canvas = surface.canvas();
        canvas.scale((opts.scale, opts.scale));
        self.draw_frame(canvas, frame, opts);
        Ok(surface)
    }

    fn draw_frame(&self, canvas: &skia::Canvas, frame: &Frame<'_>, opts: &RenderOptions) {
        canvas.clear(opts.background.map(to_color).unwrap_or(skia::Color::TRANSPARENT));

        for item in &frame.items {
            if !opts.draw_labels && matches!(item.primitive.shape, Shape::Text { .. }) {
                continue;
            }
            self.draw_item(canvas, item);
        }
        if let Some(ring) = &frame.focus {
            self.draw_focus(canvas, ring);
        }
        if let Some(p) = &frame.placeholder {
            self.draw_placeholder(canvas, &frame.viewport, p, opts);
        }
        if opts.draw_tooltips && opts.draw_labels {
            for tip in &frame.tooltips {
                self.draw_tooltip(canvas, tip, &frame.viewport);
            }
        }
    }

    fn draw_item(&self, canvas: &skia::Canvas, item: &FrameItem<'_>) {
        let opacity = item.opacity();
        if opacity <= 0.0 {
            return;
        }
        let shape = item.resolved_shape();
        let style = &item.primitive.style;

        if let Shape::Text { at, text, size, anchor, rotation_deg, bold } = &shape {
            let color = style.fill.as_ref().map(Paint::base_color).unwrap_or(self.theme.tick_label);
            self.shaper.draw_rotated(
                canvas,
                text,
                (at.x, at.y),
                *rotation_deg,
                *size,
                with_opacity(color, opacity),
                *anchor,
                *bold,
            );
            return;
        }

        let bounds = shape.bounds();
        if let Some(fill) = &style.fill {
            let mut paint = make_paint(fill, bounds, opacity);
            paint.set_style(skia::paint::Style::Fill);
            fill_shape(canvas, &shape, &paint);
        }
        if let Some(stroke) = &style.stroke {
            stroke_shape(canvas, &shape, &stroke_paint(stroke, bounds, opacity));
        }
    }

    fn draw_focus(&self, canvas: &skia::Canvas, ring: &FocusRing) {
        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_color(to_color(ring.color));
        canvas.draw_circle(sk_point(ring.center), ring.radius, &fill);

        let mut outline = skia::Paint::default();
        outline.set_anti_alias(true);
        outline.set_style(skia::paint::Style::Stroke);
        outline.set_stroke_width(2.0);
        outline.set_color(to_color(self.theme.marker_outline));
        canvas.draw_circle(sk_point(ring.center), ring.radius, &outline);
    }

    fn draw_placeholder(&self, canvas: &skia::Canvas, vp: &Viewport, p: &Placeholder, opts: &RenderOptions) {
        let full = RectF::from_ltwh(0.0, 0.0, vp.width as f32, vp.height as f32);
        if opts.background.is_none() {
            let bg = Paint::vertical(self.theme.background_top, self.theme.background_bottom);
            let paint = make_paint(&bg, Some(full), 1.0);
            canvas.draw_round_rect(sk_rect(&full), 12.0, 12.0, &paint);
        }
        if !opts.draw_labels {
            return;
        }
        let cx = full.width() / 2.0;
        let cy = full.height() / 2.0;
        self.shaper.draw(canvas, p.title, cx, cy - 6.0, 18.0, to_color(self.theme.title), TextAnchor::Middle, true);
        self.shaper.draw(canvas, p.detail, cx, cy + 20.0, 13.0, to_color(self.theme.muted), TextAnchor::Middle, false);
    }

    pub(crate) fn tone_color(&self, tone: Tone) -> skia::Color {
        to_color(self.theme.tone(tone))
    }

    /// Tooltip box to the right of its anchor, flipped left when it would leave the viewport.
    fn draw_tooltip(&self, canvas: &skia::Canvas, tip: &Tooltip, vp: &Viewport) {
        const PAD: f32 = 10.0;
        const TITLE: f32 = 13.0;
        const ROW: f32 = 12.0;
        const LINE: f32 = 17.0;

        let lines: Vec<String> = tip.rows.iter().map(|r| format!("{}: {}", r.label, r.value)).collect();
        let text_w = lines
            .iter()
            .map(|l| self.shaper.measure_width(l, ROW, false))
            .fold(self.shaper.measure_width(&tip.title, TITLE, true), f32::max);
        let w = text_w + 2.0 * PAD;
        let h = 2.0 * PAD + LINE + lines.len() as f32 * LINE;

        let (vw, vh) = (vp.width as f32, vp.height as f32);
        let mut left = tip.anchor.x + 12.0;
        if left + w > vw {
            left = tip.anchor.x - 12.0 - w;
        }
        let left = left.clamp(0.0, (vw - w).max(0.0));
        let top = (tip.anchor.y - 12.0 - h / 2.0).clamp(0.0, (vh - h).max(0.0));
        let rect = skia::Rect::from_xywh(left, top, w, h);

        let mut bg = skia::Paint::default();
        bg.set_anti_alias(true);
        bg.set_color(to_color(self.theme.tooltip_background));
        canvas.draw_round_rect(rect, 8.0, 8.0, &bg);
        let mut border = skia::Paint::default();
        border.set_anti_alias(true);
        border.set_style(skia::paint::Style::Stroke);
        border.set_stroke_width(1.0);
        border.set_color(with_opacity(self.theme.muted, 0.4));
        canvas.draw_round_rect(rect, 8.0, 8.0, &border);

        let x = left + PAD;
        let mut y = top + PAD + TITLE;
        self.shaper.draw(canvas, &tip.title, x, y, TITLE, self.tone_color(tip.title_tone), TextAnchor::Start, true);
        for (line, row) in lines.iter().zip(&tip.rows) {
            y += LINE;
            self.shaper.draw(canvas, line, x, y, ROW, self.tone_color(row.tone), TextAnchor::Start, false);
        }
    }
}

// ---- paints -------------------------------------------------------------------

fn make_paint(paint: &Paint, bounds: Option<RectF>, opacity: f32) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    match paint {
        Paint::Solid(c) => {
            p.set_color(with_opacity(*c, opacity));
        }
        Paint::Vertical(stops) | Paint::Horizontal(stops) => {
            let r = bounds.unwrap_or(RectF::from_ltrb(0.0, 0.0, 1.0, 1.0));
            let end = match paint {
                Paint::Vertical(_) => (r.left, r.bottom.max(r.top + 1.0)),
                _ => (r.right.max(r.left + 1.0), r.top),
            };
            let colors: Vec<skia::Color> = stops.iter().map(|s| to_color(s.color)).collect();
            let pos: Vec<f32> = stops.iter().map(|s| s.offset).collect();
            let shader = skia::Shader::linear_gradient(
                ((r.left, r.top), end),
                colors.as_slice(),
                pos.as_slice(),
                skia::TileMode::Clamp,
                None,
                None,
            );
            match shader {
                Some(shader) => {
                    p.set_shader(shader);
                    p.set_alpha_f(opacity.clamp(0.0, 1.0));
                }
                None => {
                    p.set_color(with_opacity(paint.base_color(), opacity));
                }
            }
        }
    }
    p
}

fn stroke_paint(stroke: &Stroke, bounds: Option<RectF>, opacity: f32) -> skia::Paint {
    let mut p = make_paint(&stroke.paint, bounds, opacity);
    p.set_style(skia::paint::Style::Stroke);
    p.set_stroke_width(stroke.width);
    p.set_stroke_cap(skia::paint::Cap::Round);
    p.set_stroke_join(skia::paint::Join::Round);
    if let Some((on, off)) = stroke.dash {
        p.set_path_effect(skia::PathEffect::dash(&[on, off], 0.0));
    }
    p
}

// ---- shapes -------------------------------------------------------------------

fn polyline_path(points: &[Pt]) -> Option<skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut path = skia::Path::new();
    path.move_to(sk_point(*first));
    for p in rest {
        path.line_to(sk_point(*p));
    }
    Some(path)
}

fn triangle_path(center: Pt, size: f32, up: bool) -> skia::Path {
    let dir = if up { -1.0 } else { 1.0 };
    let mut path = skia::Path::new();
    path.move_to((center.x, center.y + dir * size));
    path.line_to((center.x - size, center.y - dir * size * 0.75));
    path.line_to((center.x + size, center.y - dir * size * 0.75));
    path.close();
    path
}

fn bar_rect(x: f32, width: f32, base: f32, extent: f32) -> skia::Rect {
    let (a, b) = (base, base + extent);
    skia::Rect::from_ltrb(x - width / 2.0, a.min(b), x + width / 2.0, a.max(b))
}

fn fill_shape(canvas: &skia::Canvas, shape: &Shape, paint: &skia::Paint) {
    match shape {
        Shape::Rect { rect, radius } => {
            if *radius > 0.0 {
                canvas.draw_round_rect(sk_rect(rect), *radius, *radius, paint);
            } else {
                canvas.draw_rect(sk_rect(rect), paint);
            }
        }
        Shape::Area { points, baseline } => {
            let (Some(first), Some(last)) = (points.first(), points.last()) else { return };
            if let Some(mut path) = polyline_path(points) {
                path.line_to((last.x, *baseline));
                path.line_to((first.x, *baseline));
                path.close();
                canvas.draw_path(&path, paint);
            }
        }
        Shape::Circle { center, radius } => {
            canvas.draw_circle(sk_point(*center), *radius, paint);
        }
        Shape::Bar { x, width, base, extent } => {
            canvas.draw_rect(bar_rect(*x, *width, *base, *extent), paint);
        }
        Shape::Candle { x, width, body_top, body_bottom, .. } => {
            let half = width * 0.5;
            canvas.draw_rect(skia::Rect::from_ltrb(x - half, *body_top, x + half, *body_bottom), paint);
        }
        Shape::Triangle { center, size, up } => {
            canvas.draw_path(&triangle_path(*center, *size, *up), paint);
        }
        // open shapes and text have nothing to fill
        Shape::Segment { .. } | Shape::Polyline { .. } | Shape::Text { .. } => {}
    }
}

fn stroke_shape(canvas: &skia::Canvas, shape: &Shape, paint: &skia::Paint) {
    match shape {
        Shape::Segment { from, to } => {
            canvas.draw_line(sk_point(*from), sk_point(*to), paint);
        }
        Shape::Polyline { points } => {
            if let Some(path) = polyline_path(points) {
                canvas.draw_path(&path, paint);
            }
        }
        Shape::Candle { x, width, wick_top, wick_bottom, body_top, body_bottom, .. } => {
            // wick above and below the body, then the body outline
            canvas.draw_line((*x, *wick_top), (*x, *body_top), paint);
            canvas.draw_line((*x, *body_bottom), (*x, *wick_bottom), paint);
            let half = width * 0.5;
            canvas.draw_rect(skia::Rect::from_ltrb(x - half, *body_top, x + half, *body_bottom), paint);
        }
        Shape::Text { .. } => {}
        other => fill_shape(canvas, other, paint),
    }
}

// ---- surfaces -----------------------------------------------------------------

/// CPU raster surface for a `width x height` logical area at `scale`.
pub(crate) fn raster_surface(width: f32, height: f32, scale: f32) -> Result<skia::Surface> {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let w = (width * scale).round().max(1.0) as i32;
    let h = (height * scale).round().max(1.0) as i32;
    skia::surfaces::raster_n32_premul((w, h)).ok_or_else(|| anyhow!("failed to create raster surface {w}x{h}"))
}

pub(crate) fn encode_png(surface: &mut skia::Surface) -> Result<Vec<u8>> {
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

pub(crate) fn read_rgba8(surface: &mut skia::Surface) -> Result<(Vec<u8>, i32, i32, usize)> {
    let (w, h) = (surface.width(), surface.height());
    let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let stride = w as usize * 4;
    let mut px = vec![0u8; stride * h as usize];
    if !surface.read_pixels(&info, &mut px, stride, (0, 0)) {
        return Err(anyhow!("read_pixels failed for {w}x{h} surface"));
    }
    Ok((px, w, h, stride))
}

pub(crate) fn write_png(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote png");
    Ok(())
}
