//! Single-position tracks: fixed-width marks on one lane.

use crate::color::Rgba;
use crate::scene::{Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{interval_width, interval_x, PositionItem, RenderContext, TrackData, TrackDescriptor};

const MARK_HEIGHT: f32 = 12.0;

#[derive(Debug)]
pub struct PointTrack {
    name: String,
    filter: Option<String>,
    color: Rgba,
    items: Vec<PositionItem>,
    fill_override: Vec<Option<Rgba>>,
    y: f32,
    guide_id: Option<ShapeId>,
    item_ids: Vec<ShapeId>,
}

impl PointTrack {
    pub fn new(descriptor: TrackDescriptor) -> Self {
        let color = descriptor.track_color();
        let items = match descriptor.data {
            TrackData::Positions(items) => items,
            _ => vec![],
        };
        Self {
            name: descriptor.name,
            filter: descriptor.filter,
            color,
            fill_override: vec![None; items.len()],
            items,
            y: 0.0,
            guide_id: None,
            item_ids: vec![],
        }
    }

    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        self.y = y;
        self.guide_id = Some(ctx.ids.next());
        self.item_ids = self.items.iter().map(|_| ctx.ids.next()).collect();
        self.upsert_guide(ctx);
        for ix in 0..self.items.len() {
            self.upsert_item(ix, ctx, Anim::Instant);
        }
    }

    pub fn transition(&mut self, ctx: &mut RenderContext) {
        let anim = ctx.anim;
        self.upsert_guide(ctx);
        for ix in 0..self.items.len() {
            self.upsert_item(ix, ctx, anim);
        }
    }

    fn upsert_guide(&self, ctx: &mut RenderContext) {
        let Some(id) = self.guide_id else {
            return;
        };
        let gy = self.y + 6.0;
        ctx.surface.upsert(
            id,
            Shape::Polyline {
                points: vec![(ctx.x(1.0), gy), (ctx.x(ctx.seq_end), gy)],
                stroke: StrokeStyle::solid(self.color, 1.0),
                fill: Paint::None,
                curve: Curve::Linear,
            },
            Anim::Instant,
        );
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
        let position = item.position;
        let x = ctx.origin_x + interval_x(ctx.scale, position, position);
        let width = interval_width(ctx.scale, position, position);
        ctx.surface.upsert(
            self.item_ids[ix],
            Shape::Rect {
                x,
                y: self.y,
                width,
                height: MARK_HEIGHT,
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
        // Zero-length marks report a half-unit halo either side so the
        // selection overlay has visible width.
        self.items
            .get(ix)
            .map(|item| (item.position as f64 - 0.5, item.position as f64 + 0.5))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;
    use crate::scene::{IdAllocator, Scene};
    use crate::track::TrackKind;

    #[test]
    fn test_marks_have_minimum_width() {
        let items = vec![
            PositionItem {
                position: 10,
                id: "m1".to_string(),
                ..Default::default()
            },
            PositionItem {
                position: 250,
                id: "m2".to_string(),
                ..Default::default()
            },
        ];
        let mut track = PointTrack::new(
            TrackDescriptor::new(TrackKind::Unique, "Sites", TrackData::Positions(items))
                .color("#8b0000"),
        );
        let mut scene = Scene::new(800.0);
        // Wide domain: ±0.4 collapses below 2 px and must be floored.
        let scale = LinearScale::new((1.0, 100_000.0), (5.0, 665.0));
        let mut ids = IdAllocator::default();
        let mut ctx = RenderContext {
            scale: &scale,
            surface: &mut scene,
            ids: &mut ids,
            anim: Anim::Instant,
            origin_x: 110.0,
            seq_end: 100_000.0,
        };
        track.render(20.0, &mut ctx);
        for (_, shape) in scene.shapes() {
            if let Shape::Rect { width, .. } = shape {
                assert!(*width >= 2.0);
            }
        }
    }
}
