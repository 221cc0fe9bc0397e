// File: crates/chart-render-skia/src/lib.rs
// Summary: Skia renderer crate: rasterizes chart frames and KPI card grids headlessly.

pub mod cards;
pub mod raster;
pub mod text;

pub use cards::CardLayout;
pub use raster::{to_color, RenderOptions, SkiaRenderer};
pub use text::TextShaper;
