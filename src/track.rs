//! Track descriptors (the host input contract) and the closed track enum.

use crate::color::{Rgba, BLACK};
use crate::scale::LinearScale;
use crate::scene::{Anim, Curve, IdAllocator, RenderSurface};
use crate::track_bond::BondTrack;
use crate::track_interval::IntervalTrack;
use crate::track_multi_rect::MultiRectTrack;
use crate::track_point::PointTrack;
use crate::track_sequence::SequenceTrack;
use crate::track_series::SeriesTrack;
use anyhow::{anyhow, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Click handler attached to a single interval item.
pub type FeatureCallback = Arc<dyn Fn(&IntervalItem)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackKind {
    Rect,
    MultipleRect,
    Unique,
    Path,
    Line,
    Text,
}

/// One interval feature. `start == end` is legal and renders as a
/// minimum-width mark. `reverse` is tri-state: absent draws a plain
/// rectangle, `true`/`false` a direction-aware chevron.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct IntervalItem {
    #[serde(alias = "x")]
    pub start: i64,
    #[serde(alias = "y")]
    pub end: i64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub reverse: Option<bool>,
    #[serde(skip)]
    pub callback: Option<FeatureCallback>,
    /// Assigned lane; filled in by precompute.
    #[serde(skip)]
    pub level: usize,
    /// Estimated label width; filled in by precompute.
    #[serde(skip)]
    pub description_width: f32,
}

impl fmt::Debug for IntervalItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalItem")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("id", &self.id)
            .field("description", &self.description)
            .field("level", &self.level)
            .finish()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionItem {
    #[serde(alias = "x")]
    pub position: i64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BondItem {
    #[serde(alias = "x")]
    pub start: i64,
    #[serde(alias = "y")]
    pub end: i64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Peak lane, 1-based; filled in by precompute.
    #[serde(skip)]
    pub level: usize,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(alias = "x")]
    pub position: f64,
    #[serde(alias = "y")]
    pub value: f64,
}

#[derive(Clone, Debug)]
pub enum TrackData {
    Intervals(Vec<IntervalItem>),
    Positions(Vec<PositionItem>),
    Bonds(Vec<BondItem>),
    /// One or more numeric series sharing a vertical scale.
    Series(Vec<Vec<SeriesPoint>>),
    Sequence(String),
}

/// Host-facing track description, one per [`crate::FeatureViewer::add_feature`]
/// call. Deserializes from the annotation JSON shape, with `data`
/// interpreted per `type`.
#[derive(Clone, Debug)]
pub struct TrackDescriptor {
    pub kind: TrackKind,
    pub name: String,
    pub class_name: String,
    /// Track colors; single entry for most kinds, one per series for `line`.
    pub color: Vec<String>,
    pub data: TrackData,
    pub height: Option<f32>,
    /// Tag linking this track to an external legend entry.
    pub filter: Option<String>,
    pub should_sort: bool,
    pub interpolation: Curve,
    pub fill: bool,
}

impl TrackDescriptor {
    pub fn new(kind: TrackKind, name: impl Into<String>, data: TrackData) -> Self {
        Self {
            kind,
            name: name.into(),
            class_name: String::new(),
            color: vec![],
            data,
            height: None,
            filter: None,
            should_sort: true,
            interpolation: Curve::Monotone,
            fill: true,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = vec![color.into()];
        self
    }

    pub fn track_color(&self) -> Rgba {
        match self.color.first() {
            Some(text) => Rgba::parse_or(text, BLACK),
            None => BLACK,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    #[serde(rename = "type")]
    kind: TrackKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    class_name: String,
    #[serde(default)]
    color: RawColor,
    data: serde_json::Value,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    should_sort: Option<bool>,
    #[serde(default)]
    interpolation: Option<String>,
    #[serde(default)]
    fill: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(untagged)]
enum RawColor {
    #[default]
    Missing,
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for TrackDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDescriptor::deserialize(deserializer)?;
        let data = parse_track_data(raw.kind, raw.data).map_err(D::Error::custom)?;
        let color = match raw.color {
            RawColor::Missing => vec![],
            RawColor::One(c) => vec![c],
            RawColor::Many(list) => list,
        };
        let interpolation = match raw.interpolation.as_deref() {
            None | Some("monotone") => Curve::Monotone,
            Some("linear") => Curve::Linear,
            Some("step-before") | Some("stepBefore") => Curve::StepBefore,
            Some(other) => {
                log::warn!("unknown interpolation {other:?}, using monotone");
                Curve::Monotone
            }
        };
        Ok(TrackDescriptor {
            kind: raw.kind,
            name: raw.name,
            class_name: raw.class_name,
            color,
            data,
            height: raw.height,
            filter: raw.filter,
            should_sort: raw.should_sort.unwrap_or(true),
            interpolation,
            fill: raw.fill.unwrap_or(true),
        })
    }
}

fn parse_track_data(kind: TrackKind, data: serde_json::Value) -> Result<TrackData> {
    match kind {
        TrackKind::Rect | TrackKind::MultipleRect => {
            Ok(TrackData::Intervals(serde_json::from_value(data)?))
        }
        TrackKind::Unique => Ok(TrackData::Positions(serde_json::from_value(data)?)),
        TrackKind::Path => Ok(TrackData::Bonds(serde_json::from_value(data)?)),
        TrackKind::Line => {
            // A single bare series is accepted and wrapped.
            let series: Vec<Vec<SeriesPoint>> = match serde_json::from_value(data.clone()) {
                Ok(series) => series,
                Err(_) => vec![serde_json::from_value(data)?],
            };
            Ok(TrackData::Series(series))
        }
        TrackKind::Text => match data {
            serde_json::Value::String(sequence) => Ok(TrackData::Sequence(sequence)),
            other => Err(anyhow!("text track expects a sequence string, got {other}")),
        },
    }
}

/// Everything a track needs to emit shapes: the live scale, the surface,
/// the id well and the animation decision for this pass.
pub struct RenderContext<'a> {
    pub scale: &'a LinearScale,
    pub surface: &'a mut dyn RenderSurface,
    pub ids: &'a mut IdAllocator,
    pub anim: Anim,
    /// Left margin width, added to every scaled x.
    pub origin_x: f32,
    /// Last sequence position; guide lines span 1..=seq_end.
    pub seq_end: f64,
}

impl RenderContext<'_> {
    /// Absolute pixel x for a sequence position.
    #[inline(always)]
    pub fn x(&self, position: f64) -> f32 {
        self.origin_x + self.scale.scale(position)
    }
}

/// A live track: the descriptor, its computed layout and its retained
/// shape ids. Dispatch is a closed match; every variant implements the
/// same precompute/render/transition contract.
#[derive(Debug)]
pub enum Track {
    Interval(IntervalTrack),
    MultiRect(MultiRectTrack),
    Point(PointTrack),
    Bond(BondTrack),
    Series(SeriesTrack),
    Sequence(SequenceTrack),
}

impl Track {
    pub fn from_descriptor(descriptor: TrackDescriptor) -> Self {
        match descriptor.kind {
            TrackKind::Rect => Self::Interval(IntervalTrack::new(descriptor)),
            TrackKind::MultipleRect => Self::MultiRect(MultiRectTrack::new(descriptor)),
            TrackKind::Unique => Self::Point(PointTrack::new(descriptor)),
            TrackKind::Path => Self::Bond(BondTrack::new(descriptor)),
            TrackKind::Line => Self::Series(SeriesTrack::new(descriptor)),
            TrackKind::Text => Self::Sequence(SequenceTrack::from_descriptor(descriptor)),
        }
    }

    /// Lane assignment and derived geometry; runs once, before the first
    /// render, never again on zoom or resize.
    pub fn precompute(&mut self) {
        match self {
            Self::Interval(track) => track.precompute(),
            Self::MultiRect(track) => track.precompute(),
            Self::Point(_) => {}
            Self::Bond(track) => track.precompute(),
            Self::Series(track) => track.precompute(),
            Self::Sequence(_) => {}
        }
    }

    /// First draw at the given vertical offset.
    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        match self {
            Self::Interval(track) => track.render(y, ctx),
            Self::MultiRect(track) => track.render(y, ctx),
            Self::Point(track) => track.render(y, ctx),
            Self::Bond(track) => track.render(y, ctx),
            Self::Series(track) => track.render(y, ctx),
            Self::Sequence(track) => track.render(y, ctx),
        }
    }

    /// Reflow to the scale's current domain/range.
    pub fn transition(&mut self, ctx: &mut RenderContext) {
        match self {
            Self::Interval(track) => track.transition(ctx),
            Self::MultiRect(track) => track.transition(ctx),
            Self::Point(track) => track.transition(ctx),
            Self::Bond(track) => track.transition(ctx),
            Self::Series(track) => track.transition(ctx),
            Self::Sequence(track) => track.transition(ctx),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Interval(track) => track.name(),
            Self::MultiRect(track) => track.name(),
            Self::Point(track) => track.name(),
            Self::Bond(track) => track.name(),
            Self::Series(track) => track.name(),
            Self::Sequence(track) => track.name(),
        }
    }

    pub fn filter(&self) -> Option<&str> {
        match self {
            Self::Interval(track) => track.filter(),
            Self::MultiRect(track) => track.filter(),
            Self::Point(track) => track.filter(),
            Self::Bond(track) => track.filter(),
            Self::Series(track) => track.filter(),
            Self::Sequence(_) => None,
        }
    }

    /// Number of drawable feature elements; drives the animation cut-off.
    pub fn live_items(&self) -> usize {
        match self {
            Self::Interval(track) => track.len(),
            Self::MultiRect(track) => track.len(),
            Self::Point(track) => track.len(),
            Self::Bond(track) => track.len(),
            Self::Series(track) => track.point_count(),
            Self::Sequence(track) => track.live_items(),
        }
    }

    /// Index of the interval or point carrying this feature id, for the
    /// highlightable variants only.
    pub fn find_item(&self, feature_id: &str) -> Option<usize> {
        match self {
            Self::Interval(track) => track.find_item(feature_id),
            Self::MultiRect(track) => track.find_item(feature_id),
            Self::Point(track) => track.find_item(feature_id),
            _ => None,
        }
    }

    pub fn item_fill(&self, item: usize) -> Option<Rgba> {
        match self {
            Self::Interval(track) => track.item_fill(item),
            Self::MultiRect(track) => track.item_fill(item),
            Self::Point(track) => track.item_fill(item),
            _ => None,
        }
    }

    /// Repaints one item's fill in place; geometry is untouched.
    pub fn restyle_item(&mut self, item: usize, fill: Rgba, ctx: &mut RenderContext) {
        match self {
            Self::Interval(track) => track.restyle_item(item, fill, ctx),
            Self::MultiRect(track) => track.restyle_item(item, fill, ctx),
            Self::Point(track) => track.restyle_item(item, fill, ctx),
            _ => {}
        }
    }

    pub fn item_span(&self, item: usize) -> Option<(f64, f64)> {
        match self {
            Self::Interval(track) => track.item_span(item),
            Self::MultiRect(track) => track.item_span(item),
            Self::Point(track) => track.item_span(item),
            Self::Bond(track) => track.item_span(item),
            _ => None,
        }
    }

    pub fn item_callback(&self, item: usize) -> Option<FeatureCallback> {
        match self {
            Self::Interval(track) => track.item_callback(item),
            _ => None,
        }
    }

    /// Hover emphasis: expands a clipped interval label to full width.
    pub fn hover_enter(&mut self, item: usize, ctx: &mut RenderContext) {
        if let Self::Interval(track) = self {
            track.expand_label(item, ctx);
        }
    }

    pub fn hover_leave(&mut self, item: usize, ctx: &mut RenderContext) {
        if let Self::Interval(track) = self {
            track.collapse_label(item, ctx);
        }
    }
}

/// Left pixel edge of an interval; zero-length items are drawn as fixed
/// marks centered on their position.
pub(crate) fn interval_x(scale: &LinearScale, start: i64, end: i64) -> f32 {
    if start == end {
        scale.scale(start as f64 - 0.4)
    } else {
        scale.scale(start as f64)
    }
}

/// Pixel width of an interval, floored at 2 px so narrow features stay
/// visible at any zoom.
pub(crate) fn interval_width(scale: &LinearScale, start: i64, end: i64) -> f32 {
    let width = if start == end {
        scale.scale(start as f64 + 0.4) - scale.scale(start as f64 - 0.4)
    } else {
        scale.scale(end as f64) - scale.scale(start as f64)
    };
    width.max(2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_json() {
        let json = serde_json::json!({
            "type": "rect",
            "name": "Domains",
            "className": "domains",
            "color": "#1f4fcc",
            "filter": "domain",
            "data": [
                {"x": 1, "y": 50, "id": "d1", "description": "Kinase"},
                {"start": 40, "end": 90, "id": "d2", "description": "SH2", "reverse": true}
            ]
        });
        let descriptor: TrackDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(descriptor.kind, TrackKind::Rect);
        assert_eq!(descriptor.name, "Domains");
        assert!(descriptor.should_sort);
        match &descriptor.data {
            TrackData::Intervals(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].start, 1);
                assert_eq!(items[0].end, 50);
                assert_eq!(items[1].reverse, Some(true));
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn test_line_descriptor_wraps_bare_series() {
        let json = serde_json::json!({
            "type": "line",
            "name": "Hydrophobicity",
            "color": ["#238023"],
            "data": [{"x": 1.0, "y": -3.0}, {"x": 2.0, "y": 5.0}]
        });
        let descriptor: TrackDescriptor = serde_json::from_value(json).unwrap();
        match &descriptor.data {
            TrackData::Series(series) => {
                assert_eq!(series.len(), 1);
                assert_eq!(series[0].len(), 2);
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn test_multiple_rect_kind_name() {
        let json = serde_json::json!({
            "type": "multipleRect",
            "name": "Variants",
            "data": [{"x": 5, "y": 5, "id": "v1", "description": ""}]
        });
        let descriptor: TrackDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(descriptor.kind, TrackKind::MultipleRect);
    }

    #[test]
    fn test_interval_geometry_floors_at_two_pixels() {
        // Far zoomed out, a zero-length interval still gets its 2 px.
        let scale = LinearScale::new((1.0, 1_000_000.0), (5.0, 795.0));
        assert_eq!(interval_width(&scale, 500, 500), 2.0);
        let wide = interval_width(&scale, 1, 500_000);
        assert!(wide > 2.0);
    }
}
