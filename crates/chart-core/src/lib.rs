// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the backtest chart pipeline
//          (normalize -> scale -> overlays -> scene -> interaction).

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod kpi;
pub mod overlay;
pub mod record;
pub mod scale;
pub mod scene;
pub mod series;
pub mod theme;
pub mod time;
pub mod timeline;
pub mod tooltip;
pub mod types;

pub use chart::Chart;
pub use config::{ChartConfig, ChartKind};
pub use dashboard::{Dashboard, Panel, PanelContent};
pub use error::{ChartError, ChartResult};
pub use interaction::{HoverPhase, HoverState, PointerEvent};
pub use overlay::{CrossDirection, CrossoverEvent, Overlays, ThresholdBand, Thresholds, TradeMarker, TradeSide};
pub use record::{BacktestResult, RawRecord, TradeRecord};
pub use scale::{Scale, ValueDomain};
pub use scene::{build_scene, Frame, FrameItem, Layer, Primitive, Role, Scene, Shape};
pub use series::{normalize, Point, Series};
pub use theme::{Rgba, Theme, Tone};
pub use timeline::{Easing, Effect, Timeline};
pub use tooltip::{Body, Tooltip, TooltipLayer};
pub use types::{Insets, Timestamp, Viewport};
