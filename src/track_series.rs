//! Numeric series tracks: one or more line/area series sharing a vertical
//! scale sized to the largest absolute value.

use crate::color::{Rgba, BLACK};
use crate::scene::{Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{RenderContext, SeriesPoint, TrackData, TrackDescriptor};

const DEFAULT_HEIGHT: f32 = 10.0;
const BASELINE_PAD: f32 = 5.0;
/// Fraction of the way toward white for the area fill under a series.
const FILL_LIGHTEN: f32 = 0.6;

#[derive(Debug)]
pub struct SeriesTrack {
    name: String,
    filter: Option<String>,
    colors: Vec<Rgba>,
    height: f32,
    should_sort: bool,
    interpolation: Curve,
    fill: bool,
    series: Vec<Vec<SeriesPoint>>,
    /// Shared vertical level: the largest |value| across all series.
    level: f64,
    has_negative: bool,
    y: f32,
    guide_id: Option<ShapeId>,
    series_ids: Vec<ShapeId>,
}

impl SeriesTrack {
    pub fn new(descriptor: TrackDescriptor) -> Self {
        let colors = descriptor
            .color
            .iter()
            .map(|text| Rgba::parse_or(text, BLACK))
            .collect();
        let series = match descriptor.data {
            TrackData::Series(series) => series,
            _ => vec![],
        };
        Self {
            name: descriptor.name,
            filter: descriptor.filter,
            colors,
            height: descriptor.height.unwrap_or(DEFAULT_HEIGHT),
            should_sort: descriptor.should_sort,
            interpolation: descriptor.interpolation,
            fill: descriptor.fill,
            series,
            level: 0.0,
            has_negative: false,
            y: 0.0,
            guide_id: None,
            series_ids: vec![],
        }
    }

    pub fn precompute(&mut self) {
        self.level = 0.0;
        self.has_negative = false;
        for series in &mut self.series {
            if self.should_sort {
                series.sort_by(|a, b| a.position.total_cmp(&b.position));
            }
            // Anchor both ends on the baseline so area fills close cleanly.
            if let Some(first) = series.first().copied() {
                if first.value != 0.0 {
                    series.insert(
                        0,
                        SeriesPoint {
                            position: first.position - 1.0,
                            value: 0.0,
                        },
                    );
                }
            }
            if let Some(last) = series.last().copied() {
                if last.value != 0.0 {
                    series.push(SeriesPoint {
                        position: last.position + 1.0,
                        value: 0.0,
                    });
                }
            }
            for point in series.iter() {
                self.level = self.level.max(point.value.abs());
                if point.value < 0.0 {
                    self.has_negative = true;
                }
            }
        }
    }

    /// Vertical budget above the baseline; negatives mirror below it.
    #[inline(always)]
    pub fn path_level(&self) -> f32 {
        self.height * 10.0 + BASELINE_PAD
    }

    #[inline(always)]
    pub fn has_negative(&self) -> bool {
        self.has_negative
    }

    /// The symmetric vertical domain is `[-level, level]`.
    #[inline(always)]
    pub fn level(&self) -> f64 {
        self.level
    }

    fn value_y(&self, value: f64) -> f32 {
        let baseline = self.y + self.path_level();
        if self.level == 0.0 {
            return baseline;
        }
        baseline - (value / self.level) as f32 * self.height * 10.0
    }

    fn series_color(&self, ix: usize) -> Rgba {
        self.colors.get(ix).copied().unwrap_or(BLACK)
    }

    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        self.y = y;
        self.guide_id = Some(ctx.ids.next());
        self.series_ids = self.series.iter().map(|_| ctx.ids.next()).collect();
        self.upsert_guide(ctx);
        for ix in 0..self.series.len() {
            self.upsert_series(ix, ctx, Anim::Instant);
        }
    }

    pub fn transition(&mut self, ctx: &mut RenderContext) {
        let anim = ctx.anim;
        self.upsert_guide(ctx);
        for ix in 0..self.series.len() {
            self.upsert_series(ix, ctx, anim);
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
                stroke: StrokeStyle::solid(BLACK, 1.0),
                fill: Paint::None,
                curve: Curve::Linear,
            },
            Anim::Instant,
        );
    }

    fn upsert_series(&self, ix: usize, ctx: &mut RenderContext, anim: Anim) {
        let color = self.series_color(ix);
        let points: Vec<(f32, f32)> = self.series[ix]
            .iter()
            .map(|point| (ctx.x(point.position), self.value_y(point.value)))
            .collect();
        let fill = if self.fill {
            Paint::Solid(color.lighten(FILL_LIGHTEN))
        } else {
            Paint::None
        };
        ctx.surface.upsert(
            self.series_ids[ix],
            Shape::Polyline {
                points,
                stroke: StrokeStyle::solid(color, 2.0),
                fill,
                curve: self.interpolation,
            },
            anim,
        );
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(Vec::len).sum()
    }
}
