// File: crates/chart-core/tests/interaction.rs
// Purpose: Hover state machine, nearest-point ties, marker hit-testing and tooltip layer lifetime.

use chart_core::interaction::{FOCUS_RADIUS, MARKER_HIGHLIGHT};
use chart_core::tooltip::TooltipSlot;
use chart_core::types::DAY_MS;
use chart_core::{Body, Chart, ChartConfig, HoverPhase, PointerEvent, RawRecord, Role, Shape, Theme, Thresholds, TradeRecord};

fn equity_chart(body: &Body) -> Chart {
    let mut chart = Chart::mount(ChartConfig::equity(&Theme::dashboard()), "equity", body).expect("mount");
    // day 0 and day 2: the pixel midway is exactly one day from both
    chart.set_data(
        &[
            RawRecord::new().with("Date", "2024-01-01").with("Value", 10_000.0),
            RawRecord::new().with("Date", "2024-01-03").with("Value", 10_500.0),
        ],
        &[],
    );
    chart
}

fn rsi_chart(body: &Body) -> Chart {
    let mut chart = Chart::mount(ChartConfig::rsi(&Theme::dashboard(), Thresholds::default()), "rsi", body).expect("mount");
    let records: Vec<RawRecord> = [45.0, 72.5, 60.0, 25.0]
        .iter()
        .enumerate()
        .map(|(i, v)| RawRecord::new().with("Date", format!("2024-02-{:02}", i + 1)).with("RSI_Value", *v))
        .collect();
    chart.set_data(&records, &[TradeRecord { timestamp: "2024-02-02 00:05:00".into(), side: "BUY".into() }]);
    chart
}

#[test]
fn move_while_idle_is_ignored() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Move { x: 300.0, y: 200.0 });
    assert_eq!(chart.phase(), HoverPhase::Idle);
    assert!(!chart.hover().active);
    assert!(chart.hover().index.is_none());
    assert!(body.visible_tooltips().is_empty());
}

#[test]
fn enter_move_leave_round_trip() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Enter);
    assert_eq!(chart.phase(), HoverPhase::Hovering);
    assert!(chart.hover().active);
    assert!(chart.hover().index.is_none());

    chart.handle_pointer(PointerEvent::Move { x: 880.0, y: 100.0 });
    assert_eq!(chart.hover().index, Some(1));
    assert_eq!(body.visible_tooltips().len(), 1);

    chart.handle_pointer(PointerEvent::Leave);
    assert_eq!(chart.phase(), HoverPhase::Idle);
    let hover = chart.hover();
    assert!(!hover.active && hover.index.is_none() && hover.point.is_none() && hover.marker.is_none());
    assert!(body.visible_tooltips().is_empty());
    assert!(chart.frame_at(5_000).focus.is_none());
}

#[test]
fn exact_midpoint_resolves_to_earlier_point() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Enter);
    // left margin 100 + half of the 810 px plot
    chart.handle_pointer(PointerEvent::Move { x: 505.0, y: 150.0 });
    assert_eq!(chart.hover().index, Some(0));
    let date = chart.hover().point.as_ref().map(|p| p.date);
    let first = chart.series().and_then(|s| s.get(0)).map(|p| p.date);
    assert_eq!(date, first);
    assert_eq!(chart.hover().point.as_ref().and_then(|p| p.get("value")), Some(10_000.0));
}

#[test]
fn pointer_outside_plot_clamps_to_edges() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: 5.0, y: 150.0 });
    assert_eq!(chart.hover().index, Some(0));
    chart.handle_pointer(PointerEvent::Move { x: 949.0, y: 150.0 });
    assert_eq!(chart.hover().index, Some(1));
}

#[test]
fn focus_ring_and_tooltip_sit_on_resolved_point() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: 850.0, y: 300.0 });

    let scale = *chart.scale().expect("scale");
    let expected_x = 100.0 + scale.x_of(2 * DAY_MS + scale.time_domain().0);
    let expected_y = 40.0 + scale.y_of(10_500.0);

    let frame = chart.frame_at(10_000);
    let focus = frame.focus.expect("focus ring");
    assert!((focus.center.x - expected_x).abs() < 1e-3);
    assert!((focus.center.y - expected_y).abs() < 1e-3);
    assert_eq!(focus.radius, FOCUS_RADIUS);

    assert_eq!(frame.tooltips.len(), 1);
    let tip = &frame.tooltips[0];
    assert_eq!(tip.anchor, focus.center);
    assert_eq!(tip.row("Value").map(|r| r.value.as_str()), Some("$10,500.00"));
}

#[test]
fn hovering_trade_marker_emphasizes_it_and_adds_marker_tooltip() {
    let body = Body::new();
    let mut chart = rsi_chart(&body);
    let marker = chart.overlays().and_then(|o| o.trades.first()).cloned().expect("trade marker");
    assert_eq!(marker.value, 72.5);

    let (ox, oy) = chart.config().viewport.origin();
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: ox + marker.x + 3.0, y: oy + marker.y - 2.0 });
    let hover = chart.hover().marker.expect("marker hovered");
    assert_eq!(hover.index, 0);
    assert_eq!(hover.scale, MARKER_HIGHLIGHT);

    let layer = chart.tooltip_layer().expect("layer");
    let tip = layer.get(TooltipSlot::Marker).expect("marker tooltip");
    assert_eq!(tip.title, "BUY Signal");
    assert_eq!(tip.row("RSI").map(|r| r.value.as_str()), Some("72.50"));
    assert_eq!(tip.row("Zone").map(|r| r.value.as_str()), Some("Overbought"));

    let frame = chart.frame_at(10_000);
    let id = chart.scene().trade_marker_id(0).expect("marker primitive");
    let item = frame.items.iter().find(|i| i.primitive.id == id).expect("marker visible");
    assert_eq!(item.emphasis, MARKER_HIGHLIGHT);
    let (Shape::Triangle { size: drawn, .. }, Shape::Triangle { size: base, .. }) = (item.resolved_shape(), &item.primitive.shape)
    else {
        panic!("trade markers are triangles")
    };
    assert!((drawn - base * MARKER_HIGHLIGHT).abs() < 1e-4);
    assert_eq!(frame.tooltips.len(), 2);

    // moving away drops the marker highlight but keeps the cursor tooltip
    chart.handle_pointer(PointerEvent::Move { x: ox + 1.0, y: oy + 1.0 });
    assert!(chart.hover().marker.is_none());
    assert!(chart.tooltip_layer().and_then(|l| l.get(TooltipSlot::Marker)).is_none());
    assert_eq!(chart.frame_at(10_000).tooltips.len(), 1);
}

#[test]
fn rsi_cursor_tooltip_reports_zone() {
    let body = Body::new();
    let mut chart = rsi_chart(&body);
    let scale = *chart.scale().expect("scale");
    let (ox, _) = chart.config().viewport.origin();
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: ox + scale.inner_width(), y: 100.0 });
    let tip = chart.tooltip_layer().and_then(|l| l.get(TooltipSlot::Cursor)).expect("cursor tooltip");
    assert_eq!(tip.row("RSI").map(|r| r.value.as_str()), Some("25.00"));
    assert_eq!(tip.row("Zone").map(|r| r.value.as_str()), Some("Oversold"));
}

#[test]
fn one_tooltip_layer_per_chart_across_rebuilds() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    assert_eq!(body.layer_count(), 1);
    for _ in 0..5 {
        chart.set_data(&[RawRecord::new().with("Date", "2024-01-01").with("Value", 1.0)], &[]);
    }
    assert_eq!(body.layer_count(), 1);
    assert_eq!(body.layers_owned_by("equity-tooltip"), 1);

    let second = rsi_chart(&body);
    assert_eq!(body.layer_count(), 2);
    chart.unmount();
    assert_eq!(body.layer_count(), 1);
    drop(second);
    assert_eq!(body.layer_count(), 0);
}

#[test]
fn rebuild_resets_hover() {
    let body = Body::new();
    let mut chart = equity_chart(&body);
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: 505.0, y: 150.0 });
    assert!(chart.hover().active);
    chart.set_data(&[RawRecord::new().with("Date", "2024-01-01").with("Value", 1.0)], &[]);
    assert_eq!(chart.phase(), HoverPhase::Idle);
    assert!(body.visible_tooltips().is_empty());
    assert_eq!(chart.scene().with_role(Role::Line("value")).count(), 1);
}

#[test]
fn placeholder_chart_ignores_pointer() {
    let body = Body::new();
    let mut chart = Chart::mount(ChartConfig::candlestick(&Theme::dashboard()), "candles", &body).expect("mount");
    chart.set_data(&[], &[]);
    chart.handle_pointer(PointerEvent::Enter);
    chart.handle_pointer(PointerEvent::Move { x: 300.0, y: 200.0 });
    assert_eq!(chart.phase(), HoverPhase::Idle);
    assert!(chart.frame_at(0).focus.is_none());
}
