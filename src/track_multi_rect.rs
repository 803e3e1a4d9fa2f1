//! Multi-row rectangle tracks: lane-packed rows at fixed spacing, no
//! direction markers and no hover expansion.

use crate::color::Rgba;
use crate::labels;
use crate::level;
use crate::scene::{Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{IntervalItem, RenderContext, TrackData, TrackDescriptor};

const RECT_HEIGHT: f32 = 8.0;
const ROW_SHIFT: f32 = 10.0;

#[derive(Debug)]
pub struct MultiRectTrack {
    name: String,
    filter: Option<String>,
    color: Rgba,
    should_sort: bool,
    items: Vec<IntervalItem>,
    fill_override: Vec<Option<Rgba>>,
    level_count: usize,
    y: f32,
    guide_ids: Vec<ShapeId>,
    item_ids: Vec<ShapeId>,
}

impl MultiRectTrack {
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

    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        self.y = y;
        self.guide_ids = (0..self.level_count).map(|_| ctx.ids.next()).collect();
        self.item_ids = self.items.iter().map(|_| ctx.ids.next()).collect();
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
        for (lane, id) in self.guide_ids.iter().enumerate() {
            let gy = self.y + lane as f32 * ROW_SHIFT + 4.0;
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

    fn upsert_item(&self, ix: usize, ctx: &mut RenderContext, anim: Anim) {
        let item = &self.items[ix];
        let x = ctx.x(item.start as f64);
        let width = ctx.scale.scale(item.end as f64) - ctx.scale.scale(item.start as f64);
        ctx.surface.upsert(
            self.item_ids[ix],
            Shape::Rect {
                x,
                y: self.y + item.level as f32 * ROW_SHIFT,
                width,
                height: RECT_HEIGHT,
                fill: Paint::Solid(self.item_color(ix)),
            },
            anim,
        );
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
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    pub fn items(&self) -> &[IntervalItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;
    use crate::scene::{IdAllocator, Scene};
    use crate::track::TrackKind;

    #[test]
    fn test_lane_packing_matches_interval_rules() {
        let items = vec![
            IntervalItem {
                start: 1,
                end: 50,
                ..Default::default()
            },
            IntervalItem {
                start: 40,
                end: 90,
                ..Default::default()
            },
            IntervalItem {
                start: 200,
                end: 210,
                ..Default::default()
            },
        ];
        let mut track = MultiRectTrack::new(TrackDescriptor::new(
            TrackKind::MultipleRect,
            "Variants",
            TrackData::Intervals(items),
        ));
        track.precompute();
        let lanes: Vec<usize> = track.items().iter().map(|i| i.level).collect();
        assert_eq!(lanes, vec![0, 1, 0]);
    }

    #[test]
    fn test_rows_are_ten_pixels_apart() {
        let items = vec![
            IntervalItem {
                start: 1,
                end: 50,
                ..Default::default()
            },
            IntervalItem {
                start: 10,
                end: 60,
                ..Default::default()
            },
        ];
        let mut track = MultiRectTrack::new(TrackDescriptor::new(
            TrackKind::MultipleRect,
            "Variants",
            TrackData::Intervals(items),
        ));
        track.precompute();
        let mut scene = Scene::new(800.0);
        let scale = LinearScale::new((1.0, 300.0), (5.0, 665.0));
        let mut ids = IdAllocator::default();
        let mut ctx = RenderContext {
            scale: &scale,
            surface: &mut scene,
            ids: &mut ids,
            anim: Anim::Instant,
            origin_x: 110.0,
            seq_end: 300.0,
        };
        track.render(40.0, &mut ctx);
        let ys: Vec<f32> = scene
            .shapes()
            .filter_map(|(_, shape)| match shape {
                Shape::Rect { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![40.0, 50.0]);
    }
}
