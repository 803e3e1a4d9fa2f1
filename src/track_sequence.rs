//! Sequence text track: individual letters when zoomed in far enough to
//! read them, a dotted guide line otherwise.

use crate::color::BLACK;
use crate::scene::{Anchor, Anim, Curve, Paint, Shape, ShapeId, StrokeStyle};
use crate::track::{RenderContext, TrackData, TrackDescriptor};

const LETTER_FONT_SIZE: f32 = 10.0;
/// Pixels per sequence unit below which letters become illegible.
pub const DENSITY_THRESHOLD: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeqMode {
    Letters,
    Guide,
}

#[derive(Debug)]
pub struct SequenceTrack {
    name: String,
    letters: String,
    dotted: bool,
    y: f32,
    mode: Option<SeqMode>,
    letter_ids: Vec<ShapeId>,
    guide_id: Option<ShapeId>,
}

impl SequenceTrack {
    pub fn new(name: impl Into<String>, letters: impl Into<String>, dotted: bool) -> Self {
        Self {
            name: name.into(),
            letters: letters.into(),
            dotted,
            y: 0.0,
            mode: None,
            letter_ids: vec![],
            guide_id: None,
        }
    }

    pub fn from_descriptor(descriptor: TrackDescriptor) -> Self {
        let letters = match descriptor.data {
            TrackData::Sequence(letters) => letters,
            _ => String::new(),
        };
        Self::new(descriptor.name, letters, true)
    }

    /// Whether the current scale leaves enough room per letter.
    fn letters_legible(ctx: &RenderContext) -> bool {
        let (d0, d1) = ctx.scale.domain();
        let (r0, r1) = ctx.scale.range();
        let span = (d1 - d0) as f32;
        if span <= 0.0 {
            return false;
        }
        (r1 - r0) / span > DENSITY_THRESHOLD
    }

    pub fn render(&mut self, y: f32, ctx: &mut RenderContext) {
        self.y = y;
        self.apply_mode(ctx);
    }

    /// Re-evaluated on every zoom, reset and resize; flips between letters
    /// and the guide line and re-windows the letters to the visible extent.
    pub fn transition(&mut self, ctx: &mut RenderContext) {
        self.apply_mode(ctx);
    }

    fn apply_mode(&mut self, ctx: &mut RenderContext) {
        let mode = if Self::letters_legible(ctx) {
            SeqMode::Letters
        } else {
            SeqMode::Guide
        };
        self.clear_shapes(ctx);
        self.mode = Some(mode);
        match mode {
            SeqMode::Letters => self.draw_letters(ctx),
            SeqMode::Guide => self.draw_guide(ctx),
        }
    }

    fn clear_shapes(&mut self, ctx: &mut RenderContext) {
        for id in self.letter_ids.drain(..) {
            ctx.surface.remove(id);
        }
        if let Some(id) = self.guide_id.take() {
            ctx.surface.remove(id);
        }
    }

    fn draw_letters(&mut self, ctx: &mut RenderContext) {
        let (d0, d1) = ctx.scale.domain();
        let first = (d0.floor() as i64).max(1);
        let last = (d1.ceil() as i64).min(self.letters.len() as i64);
        for (offset, letter) in self
            .letters
            .chars()
            .skip((first - 1) as usize)
            .take((last - first + 1).max(0) as usize)
            .enumerate()
        {
            let position = first + offset as i64;
            let id = ctx.ids.next();
            self.letter_ids.push(id);
            ctx.surface.upsert(
                id,
                Shape::Text {
                    x: ctx.x(position as f64),
                    y: self.y,
                    text: letter.to_string(),
                    size: LETTER_FONT_SIZE,
                    anchor: Anchor::Middle,
                    fill: BLACK,
                    href: None,
                },
                Anim::Instant,
            );
        }
    }

    fn draw_guide(&mut self, ctx: &mut RenderContext) {
        if !self.dotted {
            return;
        }
        let id = ctx.ids.next();
        self.guide_id = Some(id);
        let gy = self.y - 2.0;
        ctx.surface.upsert(
            id,
            Shape::Polyline {
                points: vec![(ctx.x(1.0), gy), (ctx.x(ctx.seq_end), gy)],
                stroke: StrokeStyle {
                    color: BLACK,
                    width: 1.0,
                    dash: Some((1.0, 3.0)),
                },
                fill: Paint::None,
                curve: Curve::Linear,
            },
            Anim::Instant,
        );
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Letters are decoration, not feature elements; they never count
    /// toward the animation cut-off.
    #[inline(always)]
    pub fn live_items(&self) -> usize {
        0
    }

    pub fn letter_at(&self, position: i64) -> Option<char> {
        if position < 1 {
            return None;
        }
        self.letters.chars().nth((position - 1) as usize)
    }
}
