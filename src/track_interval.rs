//! Interval tracks: lane-packed rectangles or direction chevrons with
//! centered, truncating labels and hover expansion.

use crate::color::{Rgba, BLACK, WHITE};
use crate::labels;
use crate::level;
use crate::scene::{Anchor, Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{interval_width, interval_x, FeatureCallback, IntervalItem, RenderContext, TrackData, TrackDescriptor};

const DEFAULT_HEIGHT: f32 = 12.0;
const NOTCH: f32 = 5.0;
const LABEL_FONT_SIZE: f32 = 10.0;
/// Baseline shift that vertically centers a 10 px label.
const LABEL_BASELINE: f32 = 3.5;

#[derive(Clone, Copy, Debug)]
struct ItemIds {
    polygon: ShapeId,
    text: ShapeId,
}

#[derive(Debug)]
pub struct IntervalTrack {
    name: String,
    filter: Option<String>,
    color: Rgba,
    height: f32,
    should_sort: bool,
    items: Vec<IntervalItem>,
    fill_override: Vec<Option<Rgba>>,
    level_count: usize,
    y: f32,
    guide_ids: Vec<ShapeId>,
    item_ids: Vec<ItemIds>,
}

impl IntervalTrack {
    pub fn new(descriptor: TrackDescriptor) -> Self {
        let color = descriptor.track_color();
        let items = match descriptor.data {
            TrackData::Intervals(items) => items,
            _ => vec![],
        };
        Self {
            name: descriptor.name,
            filter: descriptor.filter,
            color,
            height: descriptor.height.unwrap_or(DEFAULT_HEIGHT),
            should_sort: descriptor.should_sort,
            fill_override: vec![None; items.len()],
            items,
            level_count: 0,
            y: 0.0,
            guide_ids: vec![],
            item_ids: vec![],
        }
    }

    pub fn precompute(&mut self) {
        if self.should_sort {
            level::sort_by_start(&mut self.items, |item| item.start);
        }
        for item in &mut self.items {
            item.description_width = labels::estimate_width(&item.description);
        }
        let spans: Vec<(i64, i64)> = self.items.iter().map(|i| (i.start, i.end)).collect();
        let levels = level::assign_levels(&spans);
        for (item, lane) in self.items.iter_mut().zip(&levels.per_item) {
            item.level = *lane;
        }
        self.level_count = levels.lanes;
    }

    /// Lane pitch; one lane of rectangle plus a third of it as a gap.
    #[inline(always)]
    fn rect_shift(&self) -> f32 {
        self.height + self.height / 3.0
    }

    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        self.y = y;
        self.guide_ids = (0..self.level_count).map(|_| ctx.ids.next()).collect();
        self.item_ids = self
            .items
            .iter()
            .map(|_| ItemIds {
                polygon: ctx.ids.next(),
                text: ctx.ids.next(),
            })
            .collect();
        self.upsert_guides(ctx);
        for ix in 0..self.items.len() {
            self.upsert_item(ix, ctx, Anim::Instant);
        }
    }

    pub fn transition(&mut self, ctx: &mut RenderContext) {
        let anim = ctx.anim;
        self.upsert_guides(ctx);
        for ix in 0..self.items.len() {
            self.upsert_item(ix, ctx, anim);
        }
    }

    fn upsert_guides(&self, ctx: &mut RenderContext) {
        let line_shift = self.height / 2.0 - 6.0;
        for (lane, id) in self.guide_ids.iter().enumerate() {
            let gy = self.y + lane as f32 * self.rect_shift() + line_shift + 6.0;
            ctx.surface.upsert(
                *id,
                Shape::Polyline {
                    points: vec![(ctx.x(1.0), gy), (ctx.x(ctx.seq_end), gy)],
                    stroke: StrokeStyle::solid(self.color, 1.0),
                    fill: Paint::None,
                    curve: Curve::Linear,
                },
                Anim::Instant,
            );
        }
    }

    fn item_color(&self, ix: usize) -> Rgba {
        if let Some(color) = self.fill_override[ix] {
            return color;
        }
        match &self.items[ix].color {
            Some(text) => Rgba::parse_or(text, self.color),
            None => self.color,
        }
    }

    /// Chevron or rectangle outline in track-local coordinates, for a
    /// drawn width of `width` pixels.
    fn outline(&self, item: &IntervalItem, width: f32) -> Vec<(f32, f32)> {
        let top = item.level as f32 * self.rect_shift();
        let bottom = top + self.height;
        let mid = top + self.height / 2.0;
        let w = width;
        match item.reverse {
            None => vec![(0.0, top), (0.0, bottom), (w, bottom), (w, top)],
            Some(true) => vec![
                (NOTCH, top),
                (0.0, mid),
                (NOTCH, bottom),
                (w, bottom),
                (w - NOTCH, mid),
                (w, top),
            ],
            Some(false) => vec![
                (0.0, top),
                (NOTCH, mid),
                (0.0, bottom),
                (w - NOTCH, bottom),
                (w, mid),
                (w - NOTCH, top),
            ],
        }
    }

    fn label_text(&self, ix: usize, fit: f32) -> String {
        let item = &self.items[ix];
        if item.description_width > fit {
            labels::truncate_to_fit(&item.description, item.description_width, fit)
        } else {
            item.description.clone()
        }
    }

    fn upsert_item(&self, ix: usize, ctx: &mut RenderContext, anim: Anim) {
        let item = &self.items[ix];
        let ids = &self.item_ids[ix];
        let x = ctx.origin_x + interval_x(ctx.scale, item.start, item.end);
        let width = interval_width(ctx.scale, item.start, item.end);
        let fill = self.item_color(ix);

        let points = self
            .outline(item, width)
            .into_iter()
            .map(|(px, py)| (px + x, py + self.y))
            .collect();
        ctx.surface.upsert(
            ids.polygon,
            Shape::Polygon {
                points,
                fill: Paint::Solid(fill),
                stroke: None,
            },
            anim,
        );

        let text_fill = if fill.is_dark() { WHITE } else { BLACK };
        ctx.surface.upsert(
            ids.text,
            Shape::Text {
                x: x + width / 2.0,
                y: self.y + item.level as f32 * self.rect_shift() + self.height / 2.0
                    + LABEL_BASELINE,
                text: self.label_text(ix, width - 10.0),
                size: LABEL_FONT_SIZE,
                anchor: Anchor::Middle,
                fill: text_fill,
                href: item.href.clone(),
            },
            anim,
        );
    }

    /// Hover emphasis: widen the polygon to hold the full description and
    /// drop the ellipsis. A no-op when the label already fits.
    pub fn expand_label(&mut self, ix: usize, ctx: &mut RenderContext) {
        let Some(item) = self.items.get(ix) else {
            return;
        };
        let width = interval_width(ctx.scale, item.start, item.end);
        if item.description_width <= width {
            return;
        }
        let ids = &self.item_ids[ix];
        let x = ctx.origin_x + interval_x(ctx.scale, item.start, item.end);
        let expanded = item.description_width + 15.0;
        let fill = self.item_color(ix);
        let points = self
            .outline(item, expanded)
            .into_iter()
            .map(|(px, py)| (px + x, py + self.y))
            .collect();
        ctx.surface.upsert(
            ids.polygon,
            Shape::Polygon {
                points,
                fill: Paint::Solid(fill),
                stroke: None,
            },
            Anim::Instant,
        );
        ctx.surface.upsert(
            ids.text,
            Shape::Text {
                x: x + item.description_width / 2.0 + 7.5,
                y: self.y + item.level as f32 * self.rect_shift() + self.height / 2.0
                    + LABEL_BASELINE,
                text: item.description.clone(),
                size: LABEL_FONT_SIZE,
                anchor: Anchor::Middle,
                fill: if fill.is_dark() { WHITE } else { BLACK },
                href: item.href.clone(),
            },
            Anim::Instant,
        );
    }

    pub fn collapse_label(&mut self, ix: usize, ctx: &mut RenderContext) {
        if self.items.get(ix).is_some() {
            self.upsert_item(ix, ctx, Anim::Instant);
        }
    }

    pub fn restyle_item(&mut self, ix: usize, fill: Rgba, ctx: &mut RenderContext) {
        if self.items.get(ix).is_none() {
            return;
        }
        self.fill_override[ix] = Some(fill);
        self.upsert_item(ix, ctx, Anim::Instant);
    }

    pub fn find_item(&self, feature_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == feature_id)
    }

    pub fn item_fill(&self, ix: usize) -> Option<Rgba> {
        if ix < self.items.len() {
            Some(self.item_color(ix))
        } else {
            None
        }
    }

    pub fn item_span(&self, ix: usize) -> Option<(f64, f64)> {
        self.items
            .get(ix)
            .map(|item| (item.start as f64, item.end as f64))
    }

    pub fn item_callback(&self, ix: usize) -> Option<FeatureCallback> {
        self.items.get(ix).and_then(|item| item.callback.clone())
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline(always)]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn items(&self) -> &[IntervalItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;
    use crate::scene::{IdAllocator, RenderSurface, Scene};
    use crate::track::TrackKind;

    fn descriptor(items: Vec<IntervalItem>) -> TrackDescriptor {
        TrackDescriptor::new(
            TrackKind::Rect,
            "Domains",
            TrackData::Intervals(items),
        )
        .color("#1f4fcc")
    }

    fn interval(start: i64, end: i64, id: &str, description: &str) -> IntervalItem {
        IntervalItem {
            start,
            end,
            id: id.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn render_env() -> (Scene, LinearScale, IdAllocator) {
        (
            Scene::new(800.0),
            LinearScale::new((1.0, 300.0), (5.0, 665.0)),
            IdAllocator::default(),
        )
    }

    #[test]
    fn test_precompute_assigns_expected_lanes() {
        let mut track = IntervalTrack::new(descriptor(vec![
            interval(1, 50, "a", ""),
            interval(40, 90, "b", ""),
            interval(200, 210, "c", ""),
        ]));
        track.precompute();
        let lanes: Vec<usize> = track.items().iter().map(|i| i.level).collect();
        assert_eq!(lanes, vec![0, 1, 0]);
        assert_eq!(track.level_count(), 2);
    }

    #[test]
    fn test_precompute_sorts_unless_opted_out() {
        let mut track = IntervalTrack::new(descriptor(vec![
            interval(40, 90, "b", ""),
            interval(1, 50, "a", ""),
        ]));
        track.precompute();
        assert_eq!(track.items()[0].id, "a");

        let mut descriptor = descriptor(vec![
            interval(40, 90, "b", ""),
            interval(1, 50, "a", ""),
        ]);
        descriptor.should_sort = false;
        let mut track = IntervalTrack::new(descriptor);
        track.precompute();
        assert_eq!(track.items()[0].id, "b");
    }

    #[test]
    fn test_render_emits_polygon_text_and_guides() {
        let (mut scene, scale, mut ids) = render_env();
        let mut track = IntervalTrack::new(descriptor(vec![interval(1, 50, "a", "Kinase")]));
        track.precompute();
        let mut ctx = RenderContext {
            scale: &scale,
            surface: &mut scene,
            ids: &mut ids,
            anim: Anim::Instant,
            origin_x: 110.0,
            seq_end: 300.0,
        };
        track.render(20.0, &mut ctx);
        // One guide line, one polygon, one text.
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_zero_length_interval_renders_minimum_width() {
        let (mut scene, scale, mut ids) = render_env();
        let mut track = IntervalTrack::new(descriptor(vec![interval(150, 150, "p", "")]));
        track.precompute();
        assert_eq!(track.level_count(), 1);
        let mut ctx = RenderContext {
            scale: &scale,
            surface: &mut scene,
            ids: &mut ids,
            anim: Anim::Instant,
            origin_x: 110.0,
            seq_end: 300.0,
        };
        track.render(20.0, &mut ctx);
        let polygon_width = scene
            .shapes()
            .find_map(|(_, shape)| match shape {
                Shape::Polygon { points, .. } => {
                    let xs: Vec<f32> = points.iter().map(|p| p.0).collect();
                    let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
                    let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                    Some(max - min)
                }
                _ => None,
            })
            .unwrap();
        assert!(polygon_width >= 2.0);
    }

    #[test]
    fn test_restyle_survives_transition() {
        let (mut scene, scale, mut ids) = render_env();
        let mut track = IntervalTrack::new(descriptor(vec![interval(1, 50, "a", "")]));
        track.precompute();
        let highlight = Rgba::opaque(0xff, 0x45, 0x00);
        {
            let mut ctx = RenderContext {
                scale: &scale,
                surface: &mut scene,
                ids: &mut ids,
                anim: Anim::Instant,
                origin_x: 110.0,
                seq_end: 300.0,
            };
            track.render(20.0, &mut ctx);
            track.restyle_item(0, highlight, &mut ctx);
            track.transition(&mut ctx);
        }
        let polygon_fill = scene.shapes().find_map(|(_, shape)| match shape {
            Shape::Polygon { fill, .. } => Some(fill.clone()),
            _ => None,
        });
        assert_eq!(polygon_fill, Some(Paint::Solid(highlight)));
    }
}
