//! Left-margin name axis: one clipped pill per track, expanding on hover
//! and restylable from an external legend.

use crate::color::Rgba;
use crate::scene::{Anchor, Anim, IdAllocator, Paint, RenderSurface, Shape, ShapeId};

const PILL_COLOR: Rgba = Rgba::opaque(0xdf, 0xd5, 0xd3);
const PILL_WIDTH: f32 = 90.0;
const PILL_HEIGHT: f32 = 15.0;
const LABEL_FONT_SIZE: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
struct PillIds {
    body: ShapeId,
    text: ShapeId,
    fade: ShapeId,
    arrow: ShapeId,
}

#[derive(Clone, Debug)]
pub struct NameEntry {
    title: String,
    y: f32,
    filter: Option<String>,
    ids: Option<PillIds>,
    expanded: bool,
    emphasis: Option<Rgba>,
}

/// The track-name pills along the left margin. Hover state is driven by
/// the viewer; this type owns only geometry and styling.
#[derive(Clone, Debug)]
pub struct NameAxis {
    margin_left: f32,
    plot_width: f32,
    entries: Vec<NameEntry>,
}

impl NameAxis {
    pub fn new(margin_left: f32, plot_width: f32) -> Self {
        Self {
            margin_left,
            plot_width,
            entries: vec![],
        }
    }

    pub fn push(&mut self, title: impl Into<String>, y: f32, filter: Option<String>) {
        self.entries.push(NameEntry {
            title: title.into(),
            y,
            filter,
            ids: None,
            expanded: false,
            emphasis: None,
        });
    }

    /// Pill expansion grows to the live plot width; kept current on resize.
    pub fn set_plot_width(&mut self, plot_width: f32) {
        self.plot_width = plot_width;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&mut self, surface: &mut dyn RenderSurface, ids: &mut IdAllocator) {
        for ix in 0..self.entries.len() {
            if self.entries[ix].title.is_empty() {
                continue;
            }
            if self.entries[ix].ids.is_none() {
                self.entries[ix].ids = Some(PillIds {
                    body: ids.next(),
                    text: ids.next(),
                    fade: ids.next(),
                    arrow: ids.next(),
                });
            }
            self.upsert_entry(ix, surface);
        }
    }

    fn upsert_entry(&self, ix: usize, surface: &mut dyn RenderSurface) {
        let entry = &self.entries[ix];
        let Some(ids) = entry.ids else {
            return;
        };
        let left = self.margin_left;
        let y = entry.y;

        let body_fill = match entry.emphasis {
            Some(color) => Paint::Gradient {
                from: PILL_COLOR,
                to: color,
            },
            None => Paint::Solid(PILL_COLOR),
        };
        let body_width = if entry.expanded {
            self.plot_width + 105.0
        } else {
            PILL_WIDTH
        };
        surface.upsert(
            ids.body,
            Shape::Rect {
                x: left - 105.0,
                y: y - 3.0,
                width: body_width,
                height: PILL_HEIGHT,
                fill: body_fill,
            },
            Anim::Instant,
        );

        surface.upsert(
            ids.text,
            Shape::Text {
                x: left - 102.0,
                y: y + 8.0,
                text: entry.title.clone(),
                size: LABEL_FONT_SIZE,
                anchor: Anchor::Start,
                fill: crate::color::BLACK,
                href: None,
            },
            Anim::Instant,
        );

        // Fade overlay hinting at clipped text; hidden while expanded.
        let fade_fill = if entry.expanded {
            Paint::None
        } else {
            Paint::Gradient {
                from: Rgba::with_alpha(PILL_COLOR.r, PILL_COLOR.g, PILL_COLOR.b, 0),
                to: PILL_COLOR,
            }
        };
        surface.upsert(
            ids.fade,
            Shape::Rect {
                x: left - 105.0,
                y: y - 3.0,
                width: PILL_WIDTH,
                height: PILL_HEIGHT,
                fill: fade_fill,
            },
            Anim::Instant,
        );

        let arrow_fill = match (entry.expanded, entry.emphasis) {
            (true, _) => Paint::None,
            (false, Some(color)) => Paint::Gradient {
                from: PILL_COLOR,
                to: color,
            },
            (false, None) => Paint::Solid(PILL_COLOR),
        };
        let arrow_points = if entry.emphasis.is_some() {
            // Emphasized pills get the full outlined arrow body.
            vec![
                (left - 105.0, y - 3.0),
                (left - 105.0, y + 12.0),
                (left - 10.0, y + 12.0),
                (left - 2.0, y + 4.5),
                (left - 10.0, y - 3.0),
            ]
        } else {
            vec![
                (left - 15.0, y + 12.0),
                (left - 7.0, y + 4.5),
                (left - 15.0, y - 3.0),
            ]
        };
        surface.upsert(
            ids.arrow,
            Shape::Polygon {
                points: arrow_points,
                fill: arrow_fill,
                stroke: None,
            },
            Anim::Instant,
        );
    }

    pub fn expand(&mut self, ix: usize, surface: &mut dyn RenderSurface) {
        if let Some(entry) = self.entries.get_mut(ix) {
            entry.expanded = true;
            self.upsert_entry(ix, surface);
        }
    }

    pub fn collapse(&mut self, ix: usize, surface: &mut dyn RenderSurface) {
        if let Some(entry) = self.entries.get_mut(ix) {
            entry.expanded = false;
            self.upsert_entry(ix, surface);
        }
    }

    /// Touch fallback: one tap expands, the next collapses.
    pub fn toggle(&mut self, ix: usize, surface: &mut dyn RenderSurface) {
        if let Some(entry) = self.entries.get_mut(ix) {
            entry.expanded = !entry.expanded;
            self.upsert_entry(ix, surface);
        }
    }

    /// Re-colors the pills of every entry tagged `tag`, cross-linking an
    /// external legend to the rendered tracks.
    pub fn emphasize(&mut self, tag: &str, color: Rgba, surface: &mut dyn RenderSurface) {
        for ix in 0..self.entries.len() {
            if self.entries[ix].filter.as_deref() == Some(tag) {
                self.entries[ix].emphasis = Some(color);
                self.upsert_entry(ix, surface);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn axis_with_entries() -> (NameAxis, Scene, IdAllocator) {
        let mut axis = NameAxis::new(110.0, 663.0);
        axis.push("Domains", 20.0, Some("domain".to_string()));
        axis.push("", 40.0, None);
        axis.push("Sites", 60.0, None);
        (axis, Scene::new(800.0), IdAllocator::default())
    }

    #[test]
    fn test_empty_titles_are_skipped() {
        let (mut axis, mut scene, mut ids) = axis_with_entries();
        axis.render(&mut scene, &mut ids);
        // Two visible entries, four shapes each.
        assert_eq!(scene.len(), 8);
    }

    #[test]
    fn test_expand_grows_body_to_plot_width() {
        let (mut axis, mut scene, mut ids) = axis_with_entries();
        axis.render(&mut scene, &mut ids);
        axis.expand(0, &mut scene);
        let widths: Vec<f32> = scene
            .shapes()
            .filter_map(|(_, shape)| match shape {
                Shape::Rect { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert!(widths.contains(&(663.0 + 105.0)));
        axis.collapse(0, &mut scene);
        let widths: Vec<f32> = scene
            .shapes()
            .filter_map(|(_, shape)| match shape {
                Shape::Rect { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert!(!widths.contains(&(663.0 + 105.0)));
    }

    #[test]
    fn test_emphasize_restyles_matching_pills() {
        let (mut axis, mut scene, mut ids) = axis_with_entries();
        axis.render(&mut scene, &mut ids);
        let accent = Rgba::opaque(0x23, 0x80, 0x23);
        axis.emphasize("domain", accent, &mut scene);
        let gradients = scene
            .shapes()
            .filter(|(_, shape)| {
                matches!(
                    shape,
                    Shape::Rect {
                        fill: Paint::Gradient { to, .. },
                        ..
                    } | Shape::Polygon {
                        fill: Paint::Gradient { to, .. },
                        ..
                    } if *to == accent
                )
            })
            .count();
        // Body and arrow of the single tagged entry.
        assert_eq!(gradients, 2);
    }
}
