//! The feature viewer: owns the tracks, the coordinate mapping, the
//! viewport and the rendering surface, and turns host events into
//! declarative scene updates.

use crate::axis;
use crate::color::{Rgba, BLACK};
use crate::debounce::SingleShot;
use crate::name_axis::NameAxis;
use crate::options::ViewerOptions;
use crate::scale::LinearScale;
use crate::scene::{Anim, Curve, IdAllocator, Paint, RenderSurface, Shape, ShapeId, StrokeStyle};
use crate::track::{RenderContext, Track, TrackDescriptor};
use crate::track_sequence::SequenceTrack;
use crate::viewport::{Extent, SelectedFeature, Viewport};
use std::time::{Duration, Instant};

const MARGIN_TOP: f32 = 20.0;
const MARGIN_LEFT: f32 = 110.0;
const MARGIN_RIGHT: f32 = 20.0;
/// Container width reserved for a host scrollbar.
const SCROLLBAR_ALLOWANCE: f32 = 17.0;
/// Pixels reserved at both ends of the mapped range.
const RANGE_PAD: f32 = 5.0;
/// Vertical spacing added before every appended track.
const TRACK_SPACING: f32 = 20.0;
/// Slack below the last track in the reported total height.
const HEIGHT_PAD: f32 = 60.0;
const TRANSITION_MS: u32 = 66;
/// Above this many live feature elements, transitions run instantly.
const ANIMATION_ITEM_LIMIT: usize = 1500;
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(300);
/// Fixed highlight fill for the selected feature.
const HIGHLIGHT: Rgba = Rgba::opaque(0xff, 0x45, 0x00);
const SELECTION_OVERLAY: Rgba = Rgba::with_alpha(0, 0, 0, 51);

/// The sequence under the tracks: literal letters, or a bare length when
/// only coordinates are known.
#[derive(Clone, Debug)]
pub enum SequenceSource {
    Letters(String),
    Length(usize),
}

impl SequenceSource {
    pub fn len(&self) -> usize {
        match self {
            Self::Letters(letters) => letters.chars().count(),
            Self::Length(length) => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn letters(&self) -> Option<&str> {
        match self {
            Self::Letters(letters) => Some(letters),
            Self::Length(_) => None,
        }
    }

    fn letter_at(&self, position: i64) -> Option<char> {
        if position < 1 {
            return None;
        }
        self.letters()?.chars().nth((position - 1) as usize)
    }
}

impl From<usize> for SequenceSource {
    fn from(length: usize) -> Self {
        Self::Length(length)
    }
}

impl From<&str> for SequenceSource {
    fn from(letters: &str) -> Self {
        Self::Letters(letters.to_string())
    }
}

impl From<String> for SequenceSource {
    fn from(letters: String) -> Self {
        Self::Letters(letters)
    }
}

/// Interactive viewer for feature tracks over one linear sequence.
///
/// The instance exclusively owns every track and all derived layout
/// state. Tracks are appended with [`add_feature`](Self::add_feature) and
/// never individually removed; [`clear_instance`](Self::clear_instance)
/// tears everything down.
pub struct FeatureViewer {
    name: String,
    sequence: SequenceSource,
    options: ViewerOptions,
    surface: Box<dyn RenderSurface>,
    scale: LinearScale,
    viewport: Viewport,
    tracks: Vec<Track>,
    name_axis: NameAxis,
    ids: IdAllocator,
    /// Running vertical offset where the next track lands.
    y_position: f32,
    /// Plot width in pixels, margins already subtracted.
    width: f32,
    animation: bool,
    resize_debounce: SingleShot,
    pending_width: Option<f32>,
    axis_ids: Vec<ShapeId>,
    vertical_line_id: Option<ShapeId>,
    selection_overlay_id: Option<ShapeId>,
    torn_down: bool,
}

impl FeatureViewer {
    /// Builds a viewer over `sequence` drawing into `surface`.
    ///
    /// Preconditions (not defended at runtime): the surface is mounted
    /// and reports a positive container width.
    pub fn create(
        name: impl Into<String>,
        sequence: impl Into<SequenceSource>,
        surface: Box<dyn RenderSurface>,
        options: ViewerOptions,
    ) -> Self {
        let name = name.into();
        let sequence = sequence.into();
        let seq_len = sequence.len() as f64;
        let offset = match options.offset {
            Some(mut offset) => {
                if offset.start < 1 {
                    log::warn!("offset.start should be > 0; it has been reset to 1");
                    offset.start = 1;
                }
                Extent::new(offset.start as f64, offset.end as f64)
            }
            None => Extent::new(1.0, seq_len),
        };
        let width = plot_width(surface.container_width());
        let scale = LinearScale::new(
            (offset.start, offset.end),
            (RANGE_PAD, width - RANGE_PAD),
        );
        let viewport = Viewport::new(offset, seq_len, options.zoom_max);
        let animation = options.animation;

        let mut viewer = Self {
            name,
            sequence,
            options,
            surface,
            scale,
            viewport,
            tracks: vec![],
            name_axis: NameAxis::new(MARGIN_LEFT, width),
            ids: IdAllocator::default(),
            y_position: 20.0,
            width,
            animation,
            resize_debounce: SingleShot::new(RESIZE_DEBOUNCE),
            pending_width: None,
            axis_ids: vec![],
            vertical_line_id: None,
            selection_overlay_id: None,
            torn_down: false,
        };

        if viewer.options.show_sequence {
            if let Some(letters) = viewer.sequence.letters().map(str::to_string) {
                let title = if viewer.name.is_empty() {
                    "Sequence".to_string()
                } else {
                    viewer.name.clone()
                };
                let mut track = Track::Sequence(SequenceTrack::new(
                    title.clone(),
                    letters,
                    viewer.options.dotted_sequence,
                ));
                let y = MARGIN_TOP + viewer.y_position;
                viewer.with_ctx(Anim::Instant, |ctx, _| track.render(y, ctx));
                viewer.tracks.push(track);
                viewer
                    .name_axis
                    .push(title, MARGIN_TOP + viewer.y_position - 8.0, None);
            }
        }
        if viewer.options.show_axis {
            viewer.render_axis();
        }
        viewer.update_height();
        viewer
    }

    /// Appends one track: precompute (lane packing), first render at the
    /// running vertical offset, canvas growth.
    pub fn add_feature(&mut self, descriptor: TrackDescriptor) {
        if self.torn_down {
            return;
        }
        self.y_position += TRACK_SPACING;
        let mut track = Track::from_descriptor(descriptor);
        track.precompute();
        let y = MARGIN_TOP + self.y_position;
        self.with_ctx(Anim::Instant, |ctx, _| track.render(y, ctx));

        let filter = track.filter().map(str::to_string);
        match &track {
            Track::Interval(t) => {
                self.name_axis
                    .push(t.name().to_string(), y, filter);
                let height = t.height();
                let rect_shift = height + height / 3.0;
                let unique_shift = if height > 12.0 { height - 6.0 } else { 0.0 };
                self.y_position += if t.level_count() < 2 {
                    unique_shift
                } else {
                    (t.level_count() - 1) as f32 * rect_shift + unique_shift
                };
            }
            Track::MultiRect(t) => {
                self.name_axis.push(t.name().to_string(), y, filter);
                self.y_position += t.level_count().saturating_sub(1) as f32 * 10.0;
            }
            Track::Point(t) => {
                self.name_axis.push(t.name().to_string(), y, filter);
            }
            Track::Sequence(t) => {
                self.name_axis.push(t.name().to_string(), y, filter);
            }
            Track::Bond(t) => {
                self.y_position += t.path_level();
                self.name_axis.push(
                    t.name().to_string(),
                    MARGIN_TOP + self.y_position - 10.0,
                    filter,
                );
            }
            Track::Series(t) => {
                self.y_position += t.path_level();
                self.name_axis.push(
                    t.name().to_string(),
                    MARGIN_TOP + self.y_position - 10.0,
                    filter,
                );
                if t.has_negative() {
                    self.y_position += t.path_level() - 5.0;
                }
            }
        }
        self.tracks.push(track);
        self.update_height();
    }

    /// Call once after the last [`add_feature`](Self::add_feature):
    /// finalizes the name axis and the bottom position axis, reports the
    /// total height and applies the animation cut-off.
    pub fn finish_render(&mut self) {
        if self.torn_down {
            return;
        }
        self.name_axis
            .render(self.surface.as_mut(), &mut self.ids);
        self.render_axis();
        self.update_height();
        let live: usize = self.tracks.iter().map(Track::live_items).sum();
        if live > ANIMATION_ITEM_LIMIT {
            self.animation = false;
        }
    }

    /// Commits a brush gesture given in sequence coordinates. Gestures not
    /// exceeding `zoom_max` are degenerate no-ops.
    pub fn brush_ended(&mut self, a: f64, b: f64) {
        if self.torn_down {
            return;
        }
        self.clear_selection_overlay();
        self.deselect();
        let Some(event) = self.viewport.zoom_to(a, b) else {
            return;
        };
        let current = self.viewport.current();
        self.scale.set_domain((current.start, current.end));
        self.transition_tracks();
        self.render_axis();
        if let Some(on_zoom) = self.options.on_zoom.as_mut() {
            on_zoom(&event);
        }
    }

    /// Clears the zoom back to the configured full extent.
    pub fn reset_all(&mut self) {
        if self.torn_down {
            return;
        }
        self.clear_selection_overlay();
        self.deselect();
        let event = self.viewport.reset();
        let offset = self.viewport.offset();
        self.scale.set_domain((offset.start, offset.end));
        self.transition_tracks();
        self.render_axis();
        if let Some(on_zoom) = self.options.on_zoom.as_mut() {
            on_zoom(&event);
        }
    }

    /// Signals that the hosting container changed width. Coalesced with a
    /// trailing-edge debounce; the layout applies on a later
    /// [`tick`](Self::tick).
    pub fn resized(&mut self, container_width: f32, now: Instant) {
        if self.torn_down {
            return;
        }
        self.pending_width = Some(container_width);
        self.resize_debounce.arm(now);
    }

    /// Pumps the debounce clock; hosts call this from their frame loop.
    pub fn tick(&mut self, now: Instant) {
        if self.resize_debounce.fire(now) {
            if let Some(container_width) = self.pending_width.take() {
                self.apply_resize(container_width);
            }
        }
    }

    fn apply_resize(&mut self, container_width: f32) {
        let width = plot_width(container_width);
        self.width = width;
        self.scale.set_range((RANGE_PAD, width - RANGE_PAD));
        self.name_axis.set_plot_width(width);
        self.transition_tracks();
        self.render_axis();
    }

    /// Highlights the feature carrying `feature_id`, restoring the
    /// previous selection's fill. Bond and series features cannot be
    /// highlighted; selecting one only clears the current highlight.
    pub fn select_feature(&mut self, feature_id: &str) -> bool {
        if self.torn_down {
            return false;
        }
        self.deselect();
        let found = self
            .tracks
            .iter()
            .enumerate()
            .find_map(|(track, t)| t.find_item(feature_id).map(|item| (track, item)));
        let Some((track, item)) = found else {
            return false;
        };
        let Some(prior_fill) = self.tracks[track].item_fill(item) else {
            return false;
        };
        self.viewport.select(SelectedFeature {
            track,
            item,
            prior_fill,
        });
        self.restyle(track, item, HIGHLIGHT);
        true
    }

    /// Click entry point: highlight, draw the translucent span overlay
    /// and fire the item's callback.
    pub fn feature_clicked(&mut self, feature_id: &str) {
        if self.torn_down {
            return;
        }
        self.select_feature(feature_id);
        let found = self
            .tracks
            .iter()
            .enumerate()
            .find_map(|(track, t)| t.find_item(feature_id).map(|item| (track, item)));
        let Some((track, item)) = found else {
            return;
        };
        if let Some(span) = self.tracks[track].item_span(item) {
            self.draw_selection_overlay(span);
        }
        if let Some(callback) = self.tracks[track].item_callback(item) {
            if let Track::Interval(t) = &self.tracks[track] {
                if let Some(interval) = t.items().get(item) {
                    callback(interval);
                }
            }
        }
    }

    /// Hover emphasis over a feature; expands truncated interval labels.
    pub fn feature_hovered(&mut self, feature_id: &str) {
        if self.torn_down {
            return;
        }
        if let Some((track, item)) = self.find_feature(feature_id) {
            let Self {
                scale,
                surface,
                ids,
                tracks,
                viewport,
                ..
            } = self;
            let mut ctx = RenderContext {
                scale,
                surface: surface.as_mut(),
                ids,
                anim: Anim::Instant,
                origin_x: MARGIN_LEFT,
                seq_end: viewport.seq_len(),
            };
            tracks[track].hover_enter(item, &mut ctx);
        }
    }

    pub fn feature_left(&mut self, feature_id: &str) {
        if self.torn_down {
            return;
        }
        if let Some((track, item)) = self.find_feature(feature_id) {
            let Self {
                scale,
                surface,
                ids,
                tracks,
                viewport,
                ..
            } = self;
            let mut ctx = RenderContext {
                scale,
                surface: surface.as_mut(),
                ids,
                anim: Anim::Instant,
                origin_x: MARGIN_LEFT,
                seq_end: viewport.seq_len(),
            };
            tracks[track].hover_leave(item, &mut ctx);
        }
    }

    pub fn label_hovered(&mut self, index: usize) {
        if !self.torn_down {
            self.name_axis.expand(index, self.surface.as_mut());
        }
    }

    pub fn label_left(&mut self, index: usize) {
        if !self.torn_down {
            self.name_axis.collapse(index, self.surface.as_mut());
        }
    }

    pub fn label_toggled(&mut self, index: usize) {
        if !self.torn_down {
            self.name_axis.toggle(index, self.surface.as_mut());
        }
    }

    /// Re-colors the name pills of every track tagged `tag`; the hook an
    /// external legend uses to point at rendered tracks.
    pub fn emphasize_track(&mut self, tag: &str, color: &str) {
        if self.torn_down {
            return;
        }
        let color = Rgba::parse_or(color, BLACK);
        self.name_axis.emphasize(tag, color, self.surface.as_mut());
    }

    /// Moves the optional vertical cursor line to the pointer.
    pub fn pointer_moved(&mut self, plot_x: f32) {
        if self.torn_down || !self.options.vertical_line {
            return;
        }
        let id = match self.vertical_line_id {
            Some(id) => id,
            None => {
                let id = self.ids.next();
                self.vertical_line_id = Some(id);
                id
            }
        };
        let x = MARGIN_LEFT + plot_x;
        let bottom = MARGIN_TOP + self.y_position + 50.0;
        self.surface.upsert(
            id,
            Shape::Polyline {
                points: vec![(x, 10.0), (x, bottom)],
                stroke: StrokeStyle::solid(BLACK, 1.0),
                fill: Paint::None,
                curve: Curve::Linear,
            },
            Anim::Instant,
        );
    }

    /// Sequence position under a plot-relative pixel x.
    pub fn position_at(&self, plot_x: f32) -> i64 {
        let extent = self.viewport.current();
        let frac = (plot_x / self.width) as f64;
        (extent.start + frac * extent.length()).round() as i64
    }

    /// Readout for the pointer position, suffixed with the sequence
    /// letter unless configured off.
    pub fn position_label(&self, plot_x: f32) -> String {
        let position = self.position_at(plot_x);
        if self.options.position_without_letter {
            return position.to_string();
        }
        match self.sequence.letter_at(position) {
            Some(letter) => format!("{position}{letter}"),
            None => position.to_string(),
        }
    }

    /// Full teardown: cancels the pending resize, drops tracks and
    /// callbacks and releases every retained surface node.
    pub fn clear_instance(&mut self) {
        self.resize_debounce.cancel();
        self.pending_width = None;
        self.tracks.clear();
        self.name_axis.clear();
        self.axis_ids.clear();
        self.vertical_line_id = None;
        self.selection_overlay_id = None;
        self.options.on_zoom = None;
        self.options.on_height_changed = None;
        self.surface.clear();
        self.torn_down = true;
    }

    #[inline(always)]
    pub fn current_extent(&self) -> Extent {
        self.viewport.current()
    }

    #[inline(always)]
    pub fn mapper(&self) -> &LinearScale {
        &self.scale
    }

    #[inline(always)]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[inline(always)]
    pub fn total_height(&self) -> f32 {
        self.y_position + HEIGHT_PAD
    }

    #[inline(always)]
    pub fn animation_enabled(&self) -> bool {
        self.animation
    }

    fn find_feature(&self, feature_id: &str) -> Option<(usize, usize)> {
        self.tracks
            .iter()
            .enumerate()
            .find_map(|(track, t)| t.find_item(feature_id).map(|item| (track, item)))
    }

    fn with_ctx<R>(&mut self, anim: Anim, f: impl FnOnce(&mut RenderContext, &mut Vec<Track>) -> R) -> R {
        let Self {
            scale,
            surface,
            ids,
            tracks,
            viewport,
            ..
        } = self;
        let mut ctx = RenderContext {
            scale,
            surface: surface.as_mut(),
            ids,
            anim,
            origin_x: MARGIN_LEFT,
            seq_end: viewport.seq_len(),
        };
        f(&mut ctx, tracks)
    }

    fn transition_tracks(&mut self) {
        let anim = if self.animation {
            Anim::Animate(TRANSITION_MS)
        } else {
            Anim::Instant
        };
        self.with_ctx(anim, |ctx, tracks| {
            for track in tracks.iter_mut() {
                track.transition(ctx);
            }
        });
    }

    fn restyle(&mut self, track: usize, item: usize, fill: Rgba) {
        self.with_ctx(Anim::Instant, |ctx, tracks| {
            if let Some(t) = tracks.get_mut(track) {
                t.restyle_item(item, fill, ctx);
            }
        });
    }

    fn deselect(&mut self) {
        if let Some(selection) = self.viewport.take_selection() {
            self.restyle(selection.track, selection.item, selection.prior_fill);
        }
    }

    fn update_height(&mut self) {
        let height = self.total_height();
        self.surface.set_height(height);
        if let Some(on_height_changed) = self.options.on_height_changed.as_mut() {
            on_height_changed(height);
        }
    }

    /// Top and bottom tick rows; rebuilt whenever the extent, the width or
    /// the total height changes.
    fn render_axis(&mut self) {
        if !self.options.show_axis {
            return;
        }
        for id in self.axis_ids.drain(..) {
            self.surface.remove(id);
        }
        let extent = self.viewport.current();
        let positions = axis::ticks(extent.start, extent.end, self.width);
        let bottom_y = MARGIN_TOP + self.y_position + 20.0;
        for &row_y in &[MARGIN_TOP, bottom_y] {
            let id = self.ids.next();
            self.axis_ids.push(id);
            self.surface.upsert(
                id,
                Shape::Polyline {
                    points: vec![
                        (MARGIN_LEFT + RANGE_PAD, row_y),
                        (MARGIN_LEFT + self.width - RANGE_PAD, row_y),
                    ],
                    stroke: StrokeStyle::solid(BLACK, 1.0),
                    fill: Paint::None,
                    curve: Curve::Linear,
                },
                Anim::Instant,
            );
            let above = row_y == MARGIN_TOP;
            for &position in &positions {
                let x = MARGIN_LEFT + self.scale.scale(position);
                let mark = self.ids.next();
                self.axis_ids.push(mark);
                let (mark_end, label_y) = if above {
                    (row_y - 4.0, row_y - 6.0)
                } else {
                    (row_y + 4.0, row_y + 14.0)
                };
                self.surface.upsert(
                    mark,
                    Shape::Polyline {
                        points: vec![(x, row_y), (x, mark_end)],
                        stroke: StrokeStyle::solid(BLACK, 1.0),
                        fill: Paint::None,
                        curve: Curve::Linear,
                    },
                    Anim::Instant,
                );
                let label = self.ids.next();
                self.axis_ids.push(label);
                self.surface.upsert(
                    label,
                    Shape::Text {
                        x,
                        y: label_y,
                        text: axis::tick_label(position),
                        size: 9.0,
                        anchor: crate::scene::Anchor::Middle,
                        fill: BLACK,
                        href: None,
                    },
                    Anim::Instant,
                );
            }
        }
    }

    fn draw_selection_overlay(&mut self, span: (f64, f64)) {
        let (mut lo, mut hi) = span;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let left_px = self.scale.scale(lo);
        let right_px = self.scale.scale(hi);
        // Clamp to the visible plot.
        let (x, width) = if left_px < 0.0 {
            (MARGIN_LEFT, right_px.max(0.0))
        } else if right_px > self.width {
            (MARGIN_LEFT + left_px, self.width - left_px)
        } else {
            (MARGIN_LEFT + left_px, right_px - left_px)
        };
        if width <= 0.0 {
            return;
        }
        let id = match self.selection_overlay_id {
            Some(id) => id,
            None => {
                let id = self.ids.next();
                self.selection_overlay_id = Some(id);
                id
            }
        };
        self.surface.upsert(
            id,
            Shape::Rect {
                x,
                y: 60.0,
                width,
                height: self.y_position + 50.0,
                fill: Paint::Solid(SELECTION_OVERLAY),
            },
            Anim::Instant,
        );
    }

    fn clear_selection_overlay(&mut self) {
        if let Some(id) = self.selection_overlay_id.take() {
            self.surface.remove(id);
        }
    }
}

fn plot_width(container_width: f32) -> f32 {
    container_width - MARGIN_LEFT - MARGIN_RIGHT - SCROLLBAR_ALLOWANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Offset;
    use crate::scene::SharedScene;
    use crate::track::{IntervalItem, TrackData, TrackKind};
    use crate::viewport::ZoomEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn interval(start: i64, end: i64, id: &str, description: &str) -> IntervalItem {
        IntervalItem {
            start,
            end,
            id: id.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn domain_track() -> TrackDescriptor {
        TrackDescriptor::new(
            TrackKind::Rect,
            "Domains",
            TrackData::Intervals(vec![
                interval(1, 50, "d1", "Kinase"),
                interval(40, 90, "d2", "SH2"),
                interval(200, 210, "d3", "Linker"),
            ]),
        )
        .color("#1f4fcc")
    }

    fn viewer_over_scene(options: ViewerOptions) -> (FeatureViewer, SharedScene) {
        let scene = SharedScene::new(800.0);
        let viewer = FeatureViewer::create(
            "sp0042",
            300usize,
            Box::new(scene.clone()),
            options,
        );
        (viewer, scene)
    }

    #[test]
    fn test_zoom_then_reset_restores_mapper_domain() {
        let (mut viewer, _scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        viewer.finish_render();
        let original = viewer.mapper().domain();
        viewer.brush_ended(100.0, 200.0);
        assert_eq!(viewer.mapper().domain(), (100.0, 200.0));
        viewer.reset_all();
        assert_eq!(viewer.mapper().domain(), original);
    }

    #[test]
    fn test_gesture_not_exceeding_zoom_max_is_noop() {
        let (mut viewer, _scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        let before = viewer.mapper().domain();
        // Default zoom_max is 50; a 50-long gesture must not commit.
        viewer.brush_ended(100.0, 150.0);
        assert_eq!(viewer.mapper().domain(), before);
        assert_eq!(viewer.current_extent(), Extent::new(1.0, 300.0));
    }

    #[test]
    fn test_on_zoom_reports_rounded_factor() {
        let events: Rc<RefCell<Vec<ZoomEvent>>> = Rc::default();
        let sink = events.clone();
        let mut options = ViewerOptions::default();
        options.on_zoom = Some(Box::new(move |event| sink.borrow_mut().push(*event)));
        let (mut viewer, _scene) = viewer_over_scene(options);
        viewer.add_feature(domain_track());
        viewer.brush_ended(100.0, 190.0);
        viewer.reset_all();
        let seen = events.borrow();
        assert_eq!(seen.len(), 2);
        // 300 / 90 = 3.333… rounds to 3.3.
        assert_eq!(seen[0].zoom_factor, 3.3);
        assert_eq!(seen[1].zoom_factor, 1.0);
        assert_eq!(seen[1].start, 1);
        assert_eq!(seen[1].end, 300);
    }

    #[test]
    fn test_configured_offset_clamps_start_and_drives_reset() {
        let mut options = ViewerOptions::default();
        options.offset = Some(Offset { start: 0, end: 250 });
        let (mut viewer, _scene) = viewer_over_scene(options);
        assert_eq!(viewer.mapper().domain(), (1.0, 250.0));
        viewer.brush_ended(80.0, 180.0);
        viewer.reset_all();
        assert_eq!(viewer.mapper().domain(), (1.0, 250.0));
    }

    #[test]
    fn test_resize_is_debounced_and_idempotent() {
        let (mut viewer, scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        viewer.finish_render();
        let t0 = Instant::now();
        viewer.resized(700.0, t0);
        // Too early: nothing applied yet.
        viewer.tick(t0 + Duration::from_millis(100));
        assert_eq!(viewer.mapper().range(), (5.0, 653.0 - 5.0));
        // A second signal re-arms; only the trailing edge applies.
        viewer.resized(600.0, t0 + Duration::from_millis(150));
        viewer.tick(t0 + Duration::from_millis(460));
        let range_after = viewer.mapper().range();
        assert_eq!(range_after, (5.0, 600.0 - 147.0 - 5.0));

        // Applying the same width again yields identical geometry.
        let snapshot: Vec<_> = scene.read().shapes().map(|(id, s)| (id, s.clone())).collect();
        viewer.resized(600.0, t0 + Duration::from_secs(2));
        viewer.tick(t0 + Duration::from_secs(3));
        let snapshot_again: Vec<_> =
            scene.read().shapes().map(|(id, s)| (id, s.clone())).collect();
        assert_eq!(snapshot, snapshot_again);
    }

    #[test]
    fn test_height_callback_grows_with_tracks() {
        let heights: Rc<RefCell<Vec<f32>>> = Rc::default();
        let sink = heights.clone();
        let mut options = ViewerOptions::default();
        options.on_height_changed = Some(Box::new(move |h| sink.borrow_mut().push(h)));
        let (mut viewer, scene) = viewer_over_scene(options);
        viewer.add_feature(domain_track());
        viewer.finish_render();
        let seen = heights.borrow();
        assert!(seen.len() >= 2);
        assert!(seen.last().unwrap() > seen.first().unwrap());
        assert_eq!(scene.read().height(), *seen.last().unwrap());
    }

    #[test]
    fn test_selection_highlight_and_restore() {
        let (mut viewer, scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        viewer.finish_render();
        assert!(viewer.select_feature("d2"));
        let highlighted = scene
            .read()
            .shapes()
            .filter(|(_, s)| {
                matches!(s, Shape::Polygon { fill: Paint::Solid(c), .. } if *c == HIGHLIGHT)
            })
            .count();
        assert_eq!(highlighted, 1);
        // Zoom commit clears the highlight and restores the fill.
        viewer.brush_ended(1.0, 200.0);
        let still_highlighted = scene
            .read()
            .shapes()
            .filter(|(_, s)| {
                matches!(s, Shape::Polygon { fill: Paint::Solid(c), .. } if *c == HIGHLIGHT)
            })
            .count();
        assert_eq!(still_highlighted, 0);
    }

    #[test]
    fn test_unknown_feature_selection_is_false() {
        let (mut viewer, _scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        assert!(!viewer.select_feature("nope"));
    }

    #[test]
    fn test_sequence_letters_appear_after_zoom() {
        let mut options = ViewerOptions::default();
        options.show_sequence = true;
        let scene = SharedScene::new(800.0);
        let letters = "ACDEFGHIKLMNPQRSTVWY".repeat(15);
        let mut viewer = FeatureViewer::create(
            "sp0042",
            letters,
            Box::new(scene.clone()),
            options,
        );
        // 653-px plot over 300 units is ~2.2 px/unit: collapsed guide.
        let texts_before = scene
            .read()
            .shapes()
            .filter(|(_, s)| matches!(s, Shape::Text { .. }))
            .count();
        assert_eq!(texts_before, 0);
        viewer.brush_ended(101.0, 200.0);
        let texts_after = scene
            .read()
            .shapes()
            .filter(|(_, s)| matches!(s, Shape::Text { .. }))
            .count();
        assert_eq!(texts_after, 100);
    }

    #[test]
    fn test_animation_disabled_above_item_limit() {
        let (mut viewer, _scene) = viewer_over_scene(ViewerOptions::default());
        let items: Vec<IntervalItem> = (0..1600)
            .map(|i| interval(i * 2 + 1, i * 2 + 2, &format!("f{i}"), ""))
            .collect();
        viewer.add_feature(TrackDescriptor::new(
            TrackKind::Rect,
            "Dense",
            TrackData::Intervals(items),
        ));
        assert!(viewer.animation_enabled());
        viewer.finish_render();
        assert!(!viewer.animation_enabled());
    }

    #[test]
    fn test_position_label_with_and_without_letter() {
        let scene = SharedScene::new(800.0);
        let viewer = FeatureViewer::create(
            "",
            "ACGT".repeat(75),
            Box::new(scene.clone()),
            ViewerOptions::default(),
        );
        let label = viewer.position_label(0.0);
        assert_eq!(label, "1A");

        let mut options = ViewerOptions::default();
        options.position_without_letter = true;
        let scene = SharedScene::new(800.0);
        let viewer =
            FeatureViewer::create("", "ACGT".repeat(75), Box::new(scene.clone()), options);
        assert_eq!(viewer.position_label(0.0), "1");
    }

    #[test]
    fn test_clear_instance_releases_everything() {
        let (mut viewer, scene) = viewer_over_scene(ViewerOptions::default());
        viewer.add_feature(domain_track());
        viewer.finish_render();
        assert!(!scene.read().is_empty());
        viewer.clear_instance();
        assert!(scene.read().is_empty());
        assert_eq!(viewer.track_count(), 0);
        // Further operations are inert.
        viewer.add_feature(domain_track());
        assert_eq!(viewer.track_count(), 0);
        assert!(scene.read().is_empty());
    }

    #[test]
    fn test_track_heights_stack_in_insertion_order() {
        let (mut viewer, _scene) = viewer_over_scene(ViewerOptions::default());
        let h0 = viewer.total_height();
        viewer.add_feature(domain_track());
        let h1 = viewer.total_height();
        viewer.add_feature(TrackDescriptor::new(
            TrackKind::Path,
            "Bonds",
            TrackData::Bonds(vec![]),
        ));
        let h2 = viewer.total_height();
        assert!(h1 > h0);
        assert!(h2 > h1);
    }
}
