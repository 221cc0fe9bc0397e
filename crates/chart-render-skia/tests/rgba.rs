// File: crates/chart-render-skia/tests/rgba.rs
// Purpose: Validate RGBA rendering buffer shape, device pixel ratio and a few pixels.

mod common;

use chart_core::{Body, Rgba, Theme};
use chart_render_skia::{RenderOptions, SkiaRenderer};

#[test]
fn render_rgba8_buffer() {
    let body = Body::new();
    let chart = common::ohlc_chart(&body);
    let renderer = SkiaRenderer::new(&Theme::dashboard());

    let opts = RenderOptions { draw_labels: false, ..Default::default() }; // avoid font variance
    let (px, w, h, stride) = renderer.render_to_rgba8(&chart.frame_at(10_000), &opts).expect("rgba render");
    assert_eq!((w, h), (900, 500));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);

    // Plot centre sits on the opaque background gradient
    let i = (250 * w as usize + 450) * 4;
    assert_eq!(px[i + 3], 255);
}

#[test]
fn scale_multiplies_surface_size() {
    let body = Body::new();
    let chart = common::rsi_chart(&body);
    let renderer = SkiaRenderer::new(&Theme::dashboard());
    let opts = RenderOptions { scale: 2.0, draw_labels: false, ..Default::default() };
    let (px, w, h, _) = renderer.render_to_rgba8(&chart.frame_at(10_000), &opts).expect("rgba render");
    assert_eq!((w, h), (1900, 600));
    assert_eq!(px.len(), 1900 * 600 * 4);
}

#[test]
fn background_override_fills_untouched_pixels() {
    let body = Body::new();
    let chart = common::ohlc_chart(&body);
    let renderer = SkiaRenderer::new(&Theme::dashboard());
    let opts = RenderOptions { background: Some(Rgba::rgb(255, 0, 255)), draw_labels: false, ..Default::default() };
    // before anything is revealed only the clear colour is visible
    let (px, ..) = renderer.render_to_rgba8(&chart.frame_at(0), &opts).expect("rgba render");
    assert_eq!(&px[..4], &[255, 0, 255, 255]);
}
