// File: crates/chart-render-skia/src/cards.rs
// Summary: KPI card grid rendering (title, headline value, plain-language explanation).

use anyhow::Result;
use skia_safe as skia;

use chart_core::kpi::KpiCard;
use chart_core::scene::TextAnchor;

use crate::raster::{encode_png, raster_surface, to_color, write_png, RenderOptions, SkiaRenderer};

/// Card grid geometry in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    pub columns: usize,
    pub card_width: f32,
    pub card_height: f32,
    pub gap: f32,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self { columns: 4, card_width: 260.0, card_height: 170.0, gap: 16.0 }
    }
}

impl CardLayout {
    /// Outer size needed for `count` cards.
    pub fn size_for(&self, count: usize) -> (f32, f32) {
        let cols = self.columns.max(1);
        let rows = count.div_ceil(cols).max(1);
        let used_cols = count.clamp(1, cols);
        (
            self.gap + used_cols as f32 * (self.card_width + self.gap),
            self.gap + rows as f32 * (self.card_height + self.gap),
        )
    }

    /// Top-left corner of card `index`.
    pub fn origin_of(&self, index: usize) -> (f32, f32) {
        let cols = self.columns.max(1);
        let (row, col) = (index / cols, index % cols);
        (
            self.gap + col as f32 * (self.card_width + self.gap),
            self.gap + row as f32 * (self.card_height + self.gap),
        )
    }
}

impl SkiaRenderer {
    pub fn render_cards_png_bytes(&self, cards: &[KpiCard], layout: &CardLayout, opts: &RenderOptions) -> Result<Vec<u8>> {
        let (w, h) = layout.size_for(cards.len());
        let mut surface = raster_surface(w, h, opts.scale)?;
        let canvas = surface.canvas();
        canvas.scale((opts.scale, opts.scale));
        let theme = self.theme();
        canvas.clear(to_color(opts.background.unwrap_or(theme.background_top)));

        for (i, card) in cards.iter().enumerate() {
            let (x, y) = layout.origin_of(i);
            self.draw_card(canvas, card, x, y, layout, opts.draw_labels);
        }
        encode_png(&mut surface)
    }

    pub fn render_cards_png(
        &self,
        cards: &[KpiCard],
        layout: &CardLayout,
        opts: &RenderOptions,
        output_png_path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let bytes = self.render_cards_png_bytes(cards, layout, opts)?;
        write_png(output_png_path.as_ref(), &bytes)
    }

    fn draw_card(&self, canvas: &skia::Canvas, card: &KpiCard, x: f32, y: f32, layout: &CardLayout, labels: bool) {
        let theme = self.theme();
        let rect = skia::Rect::from_xywh(x, y, layout.card_width, layout.card_height);

        let mut bg = skia::Paint::default();
        bg.set_anti_alias(true);
        bg.set_color(to_color(theme.background_bottom));
        canvas.draw_round_rect(rect, 10.0, 10.0, &bg);

        // tone accent strip on the left edge
        let mut accent = skia::Paint::default();
        accent.set_anti_alias(true);
        accent.set_color(self.tone_color(card.tone));
        canvas.draw_round_rect(skia::Rect::from_xywh(x, y, 4.0, layout.card_height), 2.0, 2.0, &accent);

        if !labels {
            return;
        }
        let pad = 14.0;
        let shaper = self.shaper();
        shaper.draw(canvas, card.title, x + pad, y + pad + 12.0, 12.0, to_color(theme.muted), TextAnchor::Start, false);
        shaper.draw(canvas, &card.value, x + pad, y + pad + 44.0, 26.0, self.tone_color(card.tone), TextAnchor::Start, true);
        shaper.draw_wrapped(
            canvas,
            &card.explanation,
            x + pad,
            y + pad + 56.0,
            layout.card_width - 2.0 * pad,
            11.0,
            to_color(theme.tick_label),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_wraps_after_columns() {
        let l = CardLayout::default();
        assert_eq!(l.origin_of(0), (16.0, 16.0));
        assert_eq!(l.origin_of(4), (16.0, 16.0 + 170.0 + 16.0));
        let (w, h) = l.size_for(8);
        assert_eq!(w, 16.0 + 4.0 * 276.0);
        assert_eq!(h, 16.0 + 2.0 * 186.0);
        assert_eq!(l.size_for(2).0, 16.0 + 2.0 * 276.0);
    }
}
