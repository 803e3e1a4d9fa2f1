//! Bond tracks: linked position pairs drawn as step paths rising from the
//! baseline to a packed lane and back.

use crate::color::Rgba;
use crate::level;
use crate::scene::{Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{BondItem, RenderContext, TrackData, TrackDescriptor};

/// Vertical pitch between bond lanes.
const LANE_PITCH: f32 = 10.0;
const BASELINE_PAD: f32 = 5.0;

#[derive(Debug)]
pub struct BondTrack {
    name: String,
    filter: Option<String>,
    color: Rgba,
    should_sort: bool,
    items: Vec<BondItem>,
    lanes: usize,
    y: f32,
    guide_id: Option<ShapeId>,
    item_ids: Vec<ShapeId>,
}

impl BondTrack {
    pub fn new(descriptor: TrackDescriptor) -> Self {
        let color = descriptor.track_color();
        let items = match descriptor.data {
            TrackData::Bonds(items) => items,
            _ => vec![],
        };
        Self {
            name: descriptor.name,
            filter: descriptor.filter,
            color,
            should_sort: descriptor.should_sort,
            items,
            lanes: 0,
            y: 0.0,
            guide_id: None,
            item_ids: vec![],
        }
    }

    pub fn precompute(&mut self) {
        if self.should_sort {
            level::sort_by_start(&mut self.items, |item| item.start);
        }
        let spans: Vec<(i64, i64)> = self.items.iter().map(|i| (i.start, i.end)).collect();
        let levels = level::assign_bond_levels(&spans);
        for (item, lane) in self.items.iter_mut().zip(&levels.per_item) {
            item.level = *lane;
        }
        self.lanes = levels.lanes;
    }

    /// Vertical budget of the track: one pitch per lane plus baseline pad.
    #[inline(always)]
    pub fn path_level(&self) -> f32 {
        self.lanes as f32 * LANE_PITCH + BASELINE_PAD
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
        let gy = self.y + self.path_level();
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

    /// One bond is three points, baseline → peak → baseline; the step
    /// curve turns them into the vertical-then-horizontal bracket.
    fn upsert_item(&self, ix: usize, ctx: &mut RenderContext, anim: Anim) {
        let item = &self.items[ix];
        let baseline = self.y + self.path_level();
        let peak = baseline - item.level as f32 * LANE_PITCH;
        let x0 = ctx.x(item.start as f64);
        let x1 = ctx.x(item.end as f64);
        let color = match &item.color {
            Some(text) => Rgba::parse_or(text, self.color),
            None => self.color,
        };
        ctx.surface.upsert(
            self.item_ids[ix],
            Shape::Polyline {
                points: vec![(x0, baseline), (x1, peak), (x1, baseline)],
                stroke: StrokeStyle::solid(color, 2.0),
                fill: Paint::None,
                curve: Curve::StepBefore,
            },
            anim,
        );
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
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn items(&self) -> &[BondItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;
    use crate::scene::{IdAllocator, Scene};
    use crate::track::TrackKind;

    fn bond(start: i64, end: i64) -> BondItem {
        BondItem {
            start,
            end,
            ..Default::default()
        }
    }

    #[test]
    fn test_peaks_take_one_based_lanes() {
        let mut track = BondTrack::new(TrackDescriptor::new(
            TrackKind::Path,
            "Disulfide bonds",
            TrackData::Bonds(vec![bond(1, 40), bond(20, 60), bond(80, 90)]),
        ));
        track.precompute();
        let peaks: Vec<usize> = track.items().iter().map(|i| i.level).collect();
        assert_eq!(peaks, vec![1, 2, 1]);
        assert_eq!(track.lanes(), 2);
        assert_eq!(track.path_level(), 25.0);
    }

    #[test]
    fn test_step_path_touches_baseline_and_peak() {
        let mut track = BondTrack::new(TrackDescriptor::new(
            TrackKind::Path,
            "Bonds",
            TrackData::Bonds(vec![bond(10, 50)]),
        ));
        track.precompute();
        let mut scene = Scene::new(800.0);
        let scale = LinearScale::new((1.0, 100.0), (5.0, 665.0));
        let mut ids = IdAllocator::default();
        let mut ctx = RenderContext {
            scale: &scale,
            surface: &mut scene,
            ids: &mut ids,
            anim: Anim::Instant,
            origin_x: 110.0,
            seq_end: 100.0,
        };
        track.render(20.0, &mut ctx);
        // path_level = 1 lane * 10 + 5; baseline at 35, peak at 25.
        let (bond_points, curve) = scene
            .shapes()
            .filter_map(|(_, shape)| match shape {
                Shape::Polyline { points, stroke, curve, .. } if stroke.width == 2.0 => {
                    Some((points.clone(), *curve))
                }
                _ => None,
            })
            .next()
            .unwrap();
        assert_eq!(curve, Curve::StepBefore);
        assert_eq!(bond_points.len(), 3);
        assert_eq!(bond_points[0].1, 35.0);
        assert_eq!(bond_points[1].1, 25.0);
        assert_eq!(bond_points[2].1, 35.0);
    }
}
