//! Zoom/pan state: the visible extent, gesture validation and the
//! selection/highlight record.

use crate::color::Rgba;

/// Sub-range of the sequence domain currently mapped to the full pixel
/// width. Invariant: `start < end`, both inside the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub start: f64,
    pub end: f64,
}

impl Extent {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Payload of the host's zoom notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomEvent {
    pub start: i64,
    pub end: i64,
    /// `domain length / extent length`, rounded to one decimal.
    pub zoom_factor: f64,
}

/// The one highlighted feature, with its fill before highlighting so a
/// deselect can restore it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedFeature {
    pub track: usize,
    pub item: usize,
    pub prior_fill: Rgba,
}

/// Owns the current extent and all interactive selection state. Single
/// steady state; every transition is atomic and synchronous.
#[derive(Clone, Debug)]
pub struct Viewport {
    offset: Extent,
    seq_len: f64,
    current: Extent,
    zoom_max: f64,
    selection: Option<SelectedFeature>,
}

impl Viewport {
    pub fn new(offset: Extent, seq_len: f64, zoom_max: f64) -> Self {
        Self {
            offset,
            seq_len,
            current: offset,
            zoom_max,
            selection: None,
        }
    }

    #[inline(always)]
    pub fn current(&self) -> Extent {
        self.current
    }

    #[inline(always)]
    pub fn offset(&self) -> Extent {
        self.offset
    }

    #[inline(always)]
    pub fn seq_len(&self) -> f64 {
        self.seq_len
    }

    /// Commits a brush gesture. Gestures whose raw length does not exceed
    /// the zoom threshold are degenerate and rejected as a no-op.
    pub fn zoom_to(&mut self, a: f64, b: f64) -> Option<ZoomEvent> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let length = hi - lo;
        if length <= self.zoom_max {
            return None;
        }
        let lo = lo.max(1.0);
        let hi = hi.min(self.seq_len.max(1.0));
        if hi <= lo {
            return None;
        }
        self.current = Extent::new(lo, hi);
        Some(ZoomEvent {
            start: (lo - 1.0) as i64,
            end: (hi + 1.0) as i64,
            zoom_factor: round_one_decimal(self.seq_len / length),
        })
    }

    /// Returns to the configured full extent.
    pub fn reset(&mut self) -> ZoomEvent {
        self.current = self.offset;
        ZoomEvent {
            start: self.offset.start as i64,
            end: self.offset.end as i64,
            zoom_factor: 1.0,
        }
    }

    /// Replaces the highlighted feature, handing back the evicted record
    /// so its fill can be restored.
    pub fn select(&mut self, selection: SelectedFeature) -> Option<SelectedFeature> {
        self.selection.replace(selection)
    }

    pub fn take_selection(&mut self) -> Option<SelectedFeature> {
        self.selection.take()
    }

    #[inline(always)]
    pub fn selection(&self) -> Option<&SelectedFeature> {
        self.selection.as_ref()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
