// File: crates/chart-core/tests/scene.rs
// Purpose: Scene building: layer order, monotonic timeline, placeholders, idempotent rebuilds,
//          frame sampling and per-chart decorations.

use chart_core::geometry::polyline_length;
use chart_core::overlay::Thresholds;
use chart_core::scene::stage;
use chart_core::series::fields;
use chart_core::{Body, Chart, ChartConfig, Layer, RawRecord, Role, Shape, Theme, TradeRecord};

fn day(i: usize) -> String {
    format!("2024-01-{:02} 00:00:00", i + 1)
}

fn ohlc(n: usize, with_volume: bool) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let base = 100.0 + i as f64;
            let close = if i % 2 == 0 { base + 1.5 } else { base - 1.5 };
            let mut r = RawRecord::new()
                .with("Date", day(i))
                .with("Open", base)
                .with("High", base + 3.0)
                .with("Low", base - 3.0)
                .with("Close", close);
            if with_volume {
                r = r.with("Volume", 1_000 + i as u64 * 10);
            }
            r
        })
        .collect()
}

fn rsi_records(values: &[f64]) -> Vec<RawRecord> {
    values.iter().enumerate().map(|(i, v)| RawRecord::new().with("Date", day(i)).with("RSI_Value", *v)).collect()
}

fn mounted(config: ChartConfig, body: &Body) -> Chart {
    Chart::mount(config, "test", body).expect("mount")
}

#[test]
fn primitives_are_layer_ordered_with_index_ids() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::candlestick(&Theme::dashboard()), &body);
    chart.set_data(&ohlc(12, true), &[]);
    let prims = chart.scene().primitives();
    assert!(!prims.is_empty());
    assert!(prims.windows(2).all(|w| w[0].layer <= w[1].layer));
    assert!(prims.iter().enumerate().all(|(i, p)| p.id.0 as usize == i));
    assert_eq!(prims[0].role, Role::Background);
    assert_eq!(prims.last().map(|p| p.layer), Some(Layer::Annotation));
}

#[test]
fn timeline_delays_never_decrease() {
    let body = Body::new();
    let trades = vec![TradeRecord { timestamp: day(3), side: "BUY".into() }];
    let mut chart = mounted(ChartConfig::rsi(&Theme::dashboard(), Thresholds::default()), &body);
    chart.set_data(&rsi_records(&[20.0, 35.0, 50.0, 65.0, 80.0, 75.0, 40.0]), &trades);
    let timeline = chart.scene().timeline();
    assert!(timeline.is_monotonic());
    assert_eq!(timeline.cues().len(), chart.scene().len());
    assert!(timeline.total_duration_ms() >= stage::TRADES);
}

#[test]
fn per_point_stagger_stays_within_its_span() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::candlestick(&Theme::dashboard()), &body);
    chart.set_data(&ohlc(28, false), &[]);
    let scene = chart.scene();
    let delays: Vec<u32> = scene
        .primitives()
        .iter()
        .zip(scene.timeline().cues())
        .filter(|(p, _)| p.role == Role::Candle)
        .map(|(_, c)| c.delay_ms)
        .collect();
    assert_eq!(delays.len(), 28);
    let first = delays[0];
    let last = delays[delays.len() - 1];
    assert!(first >= stage::LINES);
    assert!(last - first <= stage::CANDLE_SPAN, "{first}..{last}");
}

#[test]
fn empty_ohlc_yields_placeholder_without_error() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::candlestick(&Theme::dashboard()), &body);
    chart.set_data(&[], &[]);
    let scene = chart.scene();
    assert!(scene.is_placeholder());
    assert_eq!(scene.len(), 0);
    assert_eq!(scene.placeholder_text().map(|p| p.title), Some("No OHLC Data Available"));
    assert!(chart.scale().is_none());
    let frame = chart.frame_at(10_000);
    assert!(frame.items.is_empty());
    assert!(frame.placeholder.is_some());
}

#[test]
fn all_records_malformed_also_yields_placeholder() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::equity(&Theme::dashboard()), &body);
    chart.set_data(&[RawRecord::new().with("Date", "nope").with("Value", 1.0)], &[]);
    assert!(chart.scene().is_placeholder());
}

#[test]
fn unrepresentable_epoch_date_yields_placeholder() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::equity(&Theme::dashboard()), &body);
    chart.set_data(&[RawRecord::new().with("Date", i64::MAX).with("Value", 1.0)], &[]);
    assert!(chart.scene().is_placeholder());
    assert!(chart.scale().is_none());
}

#[test]
fn rebuilding_with_same_data_is_idempotent() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::candlestick(&Theme::dashboard()), &body);
    let data = ohlc(9, true);
    chart.set_data(&data, &[]);
    let first_scene = chart.scene().clone();
    let first_scale = *chart.scale().expect("scale");
    chart.set_data(&data, &[]);
    let scale = chart.scale().expect("scale");
    assert_eq!(scale.time_domain(), first_scale.time_domain());
    assert_eq!(scale.value_domain(), first_scale.value_domain());
    for layer in [Layer::Background, Layer::Grid, Layer::Axes, Layer::Area, Layer::Line, Layer::Marker, Layer::Annotation] {
        assert_eq!(chart.scene().count_in(layer), first_scene.count_in(layer), "{layer:?}");
    }
    assert_eq!(chart.scene(), &first_scene);
    assert_eq!(chart.rebuilds(), 2);
}

#[test]
fn volume_bars_only_when_volume_present() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::candlestick(&Theme::dashboard()), &body);
    chart.set_data(&ohlc(6, false), &[]);
    assert_eq!(chart.scene().with_role(Role::Volume).count(), 0);
    assert_eq!(chart.scene().with_role(Role::Candle).count(), 6);
    chart.set_data(&ohlc(6, true), &[]);
    assert_eq!(chart.scene().with_role(Role::Volume).count(), 6);
}

#[test]
fn frames_progress_from_nothing_to_settled() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::equity(&Theme::dashboard()), &body);
    let records: Vec<RawRecord> =
        (0..30).map(|i| RawRecord::new().with("Date", day(i)).with("Value", 10_000.0 + (i * i) as f64)).collect();
    chart.set_data(&records, &[]);
    let scene = chart.scene();

    let line = scene.with_role(Role::Line(fields::VALUE)).next().expect("equity line");
    let Shape::Polyline { points } = &line.shape else { panic!("line is a polyline") };
    let full = polyline_length(points);

    let early = chart.frame_at(0);
    assert!(early.items.iter().all(|i| i.primitive.layer <= Layer::Grid));

    let mid = chart.frame_at(stage::LINES + 1000);
    let item = mid.items.iter().find(|i| i.primitive.id == line.id).expect("line started");
    let Shape::Polyline { points: partial } = item.resolved_shape() else { panic!("polyline") };
    let partial_len = polyline_length(&partial);
    assert!(partial_len > 0.0 && partial_len < full, "{partial_len} of {full}");

    let done = scene.timeline().total_duration_ms();
    let settled = chart.frame_at(done);
    assert_eq!(settled.items.len(), scene.len());
    assert!(settled.items.iter().all(|i| (i.progress - 1.0).abs() < 1e-6));
}

#[test]
fn rsi_scene_carries_bands_thresholds_midline_and_zone_dots() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::rsi(&Theme::dashboard(), Thresholds::default()), &body);
    let values: Vec<f64> = (0..120).map(|i| 50.0 + 35.0 * ((i as f64) / 6.0).sin()).collect();
    chart.set_data(&rsi_records(&values[..28]), &[]);
    let scene = chart.scene();
    assert_eq!(scene.with_role(Role::Band).count(), 2);
    assert_eq!(scene.with_role(Role::ThresholdLine).count(), 2);
    assert_eq!(scene.with_role(Role::Midline).count(), 1);
    assert_eq!(scene.with_role(Role::ThresholdLabel).count(), 2);
    // 28 points: every ceil(28/50) = 1st point
    assert_eq!(scene.with_role(Role::Dot).count(), 28);

    let theme = Theme::dashboard();
    let hot = scene
        .with_role(Role::Dot)
        .filter(|p| p.style.fill.as_ref().map(|f| f.base_color()) == Some(theme.overbought))
        .count();
    let expected = values[..28].iter().filter(|v| **v > 70.0).count();
    assert_eq!(hot, expected);
}

#[test]
fn sma_scene_has_two_lines_legend_and_crossovers() {
    let body = Body::new();
    let mut chart = mounted(ChartConfig::sma_crossover(&Theme::dashboard()), &body);
    let rows = [(9.0, 10.0), (11.0, 10.0), (12.0, 10.5), (10.0, 11.0), (9.0, 10.0)];
    let records: Vec<RawRecord> = rows
        .iter()
        .enumerate()
        .map(|(i, (s, l))| RawRecord::new().with("Date", day(i)).with("Short_SMA", *s).with("Long_SMA", *l))
        .collect();
    chart.set_data(&records, &[TradeRecord { timestamp: day(2), side: "SELL".into() }]);
    let scene = chart.scene();
    assert_eq!(scene.with_role(Role::Line(fields::SHORT_SMA)).count(), 1);
    assert_eq!(scene.with_role(Role::Line(fields::LONG_SMA)).count(), 1);
    assert_eq!(scene.with_role(Role::AreaFill(fields::SHORT_SMA)).count(), 1);
    assert_eq!(scene.with_role(Role::Crossover).count(), 2);
    assert_eq!(scene.with_role(Role::Legend).count(), 4);
    assert!(scene.trade_marker_id(0).is_some());
    assert_eq!(scene.with_role(Role::TradeLabel(0)).count(), 1);
}
