// File: crates/chart-render-skia/src/text.rs
// Summary: Text shaping with Skia textlayout: anchored, rotated and bold labels.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

use chart_core::scene::TextAnchor;

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color, bold: bool) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);
        if bold {
            ts.set_font_style(skia::FontStyle::bold());
        }
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color, bold: bool) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color, bold));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.layout(text, size, skia::Color::TRANSPARENT, bold).longest_line()
    }

    /// Draw with `(x, y)` as the baseline point; `anchor` picks which end of the run sits at `x`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: skia::Color,
        anchor: TextAnchor,
        bold: bool,
    ) {
        let mut p = self.layout(text, size, color, bold);
        let w = p.longest_line();
        let dx = match anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -w / 2.0,
            TextAnchor::End => -w,
        };
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(canvas, (x + dx, y - size * 0.8));
    }

    /// Same as [`draw`](Self::draw), rotated by `degrees` around the anchor point.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rotated(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        at: (f32, f32),
        degrees: f32,
        size: f32,
        color: skia::Color,
        anchor: TextAnchor,
        bold: bool,
    ) {
        if degrees == 0.0 {
            self.draw(canvas, text, at.0, at.1, size, color, anchor, bold);
            return;
        }
        canvas.save();
        canvas.rotate(degrees, Some(skia::Point::new(at.0, at.1)));
        self.draw(canvas, text, at.0, at.1, size, color, anchor, bold);
        canvas.restore();
    }
}

impl TextShaper {
    /// Lay out `text` wrapped to `max_width` with its top-left at `(x, y)`. Returns the height used.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_wrapped(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        size: f32,
        color: skia::Color,
    ) -> f32 {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color, false));
        builder.add_text(text);
        let mut p = builder.build();
        p.layout(max_width.max(1.0));
        p.paint(canvas, (x, y));
        p.height()
    }
}
