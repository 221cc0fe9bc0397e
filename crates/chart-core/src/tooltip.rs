// File: crates/chart-core/src/tooltip.rs
// Summary: Tooltip content builders and the document-body tooltip layer registry.
// Notes:
// - `Body` stands in for the host document body: charts append one tooltip layer each.
// - A `TooltipLayer` removes itself from the body when dropped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::config::{ChartConfig, TooltipField};
use crate::format::change_label;
use crate::geometry::Pt;
use crate::overlay::{TradeMarker, TradeSide, Zone};
use crate::series::{fields, Point};
use crate::theme::Tone;
use crate::time::format_timestamp;

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl TooltipRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self { label: label.into(), value: value.into(), tone }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Outer pixel position of the data point the tooltip describes.
    pub anchor: Pt,
    pub title: String,
    pub title_tone: Tone,
    pub rows: Vec<TooltipRow>,
}

impl Tooltip {
    pub fn row(&self, label: &str) -> Option<&TooltipRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

fn field_rows(point: &Point, fields: &[TooltipField]) -> Vec<TooltipRow> {
    fields
        .iter()
        .filter_map(|f| Some(TooltipRow::new(f.label, f.format.apply(f.value.of(point)?), Tone::Neutral)))
        .collect()
}

fn zone_row(config: &ChartConfig, value: f64) -> Option<TooltipRow> {
    let th = config.overlays.thresholds?;
    let zone = th.zone(value);
    let tone = match zone {
        Zone::Overbought => Tone::Negative,
        Zone::Oversold => Tone::Positive,
        Zone::Neutral => Tone::Neutral,
    };
    Some(TooltipRow::new("Zone", zone.label(), tone))
}

/// Cursor tooltip for a resolved series point.
pub fn point_tooltip(point: &Point, config: &ChartConfig, anchor: Pt) -> Tooltip {
    let tip = &config.tooltip;
    let mut rows = field_rows(point, &tip.fields);
    if tip.change {
        if let (Some(o), Some(c)) = (point.get(fields::OPEN), point.get(fields::CLOSE)) {
            let tone = if c >= o { Tone::Positive } else { Tone::Negative };
            rows.push(TooltipRow::new("Change", change_label(o, c), tone));
        }
    }
    if tip.zone {
        if let Some(row) = config.focus.of(point).and_then(|v| zone_row(config, v)) {
            rows.push(row);
        }
    }
    Tooltip { anchor, title: format_timestamp(point.date, tip.date_format), title_tone: Tone::Neutral, rows }
}

/// Tooltip for a hovered trade marker: side, date and the overlay values at the anchor.
pub fn marker_tooltip(marker: &TradeMarker, config: &ChartConfig, anchor: Pt) -> Tooltip {
    let tip = &config.tooltip;
    let mut rows = vec![TooltipRow::new("Date", format_timestamp(marker.date, tip.date_format), Tone::Neutral)];
    rows.extend(field_rows(&marker.anchor, &tip.marker_fields));
    if tip.zone {
        rows.extend(zone_row(config, marker.value));
    }
    let title_tone = match marker.side {
        TradeSide::Buy => Tone::Positive,
        TradeSide::Sell => Tone::Negative,
    };
    Tooltip { anchor, title: format!("{} Signal", marker.side.label()), title_tone, rows }
}

/// Independent tooltip slots within one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipSlot {
    Cursor,
    Marker,
}

#[derive(Debug, Default)]
struct LayerState {
    owner: String,
    cursor: Option<Tooltip>,
    marker: Option<Tooltip>,
}

#[derive(Debug, Default)]
pub struct BodyState {
    next_id: u64,
    layers: BTreeMap<u64, LayerState>,
}

/// Shared host body that tooltip layers are appended to.
#[derive(Clone, Debug, Default)]
pub struct Body(Rc<RefCell<BodyState>>);

impl Body {
    pub fn new() -> Self { Self::default() }

    pub fn layer_count(&self) -> usize { self.0.borrow().layers.len() }

    pub fn layers_owned_by(&self, owner: &str) -> usize {
        self.0.borrow().layers.values().filter(|l| l.owner == owner).count()
    }

    /// Every tooltip currently shown, in layer order.
    pub fn visible_tooltips(&self) -> Vec<Tooltip> {
        let state = self.0.borrow();
        state
            .layers
            .values()
            .flat_map(|l| l.cursor.iter().chain(l.marker.iter()))
            .cloned()
            .collect()
    }

    /// Append a new, empty tooltip layer.
    pub fn acquire(&self, owner: impl Into<String>) -> TooltipLayer {
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let owner = owner.into();
        trace!(id, owner = %owner, "tooltip layer appended");
        state.layers.insert(id, LayerState { owner, ..Default::default() });
        TooltipLayer { id, body: Rc::downgrade(&self.0) }
    }
}

/// One chart's tooltip layer. Dropping it removes the layer from the body.
#[derive(Debug)]
pub struct TooltipLayer {
    id: u64,
    body: Weak<RefCell<BodyState>>,
}

impl TooltipLayer {
    fn with_state<R>(&self, f: impl FnOnce(&mut LayerState) -> R) -> Option<R> {
        let body = self.body.upgrade()?;
        let mut state = body.borrow_mut();
        state.layers.get_mut(&self.id).map(f)
    }

    pub fn show(&self, slot: TooltipSlot, tooltip: Tooltip) {
        self.with_state(|l| match slot {
            TooltipSlot::Cursor => l.cursor = Some(tooltip),
            TooltipSlot::Marker => l.marker = Some(tooltip),
        });
    }

    pub fn hide(&self, slot: TooltipSlot) {
        self.with_state(|l| match slot {
            TooltipSlot::Cursor => l.cursor = None,
            TooltipSlot::Marker => l.marker = None,
        });
    }

    pub fn hide_all(&self) {
        self.with_state(|l| {
            l.cursor = None;
            l.marker = None;
        });
    }

    pub fn get(&self, slot: TooltipSlot) -> Option<Tooltip> {
        self.with_state(|l| match slot {
            TooltipSlot::Cursor => l.cursor.clone(),
            TooltipSlot::Marker => l.marker.clone(),
        })
        .flatten()
    }

    /// Shown tooltips, cursor first.
    pub fn visible(&self) -> Vec<Tooltip> {
        [TooltipSlot::Cursor, TooltipSlot::Marker].into_iter().filter_map(|s| self.get(s)).collect()
    }
}

impl Drop for TooltipLayer {
    fn drop(&mut self) {
        if let Some(body) = self.body.upgrade() {
            body.borrow_mut().layers.remove(&self.id);
            trace!(id = self.id, "tooltip layer removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_layer_removes_it_from_body() {
        let body = Body::new();
        let a = body.acquire("equity-tooltip");
        let b = body.acquire("rsi-tooltip");
        assert_eq!(body.layer_count(), 2);
        drop(a);
        assert_eq!(body.layer_count(), 1);
        assert_eq!(body.layers_owned_by("rsi-tooltip"), 1);
        drop(b);
        assert_eq!(body.layer_count(), 0);
    }

    #[test]
    fn layer_outliving_body_is_harmless() {
        let body = Body::new();
        let layer = body.acquire("x");
        drop(body);
        layer.hide_all();
        assert!(layer.visible().is_empty());
    }
}
