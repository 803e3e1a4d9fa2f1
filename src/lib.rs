//! Interactive track viewer for annotated linear sequences.
//!
//! A host constructs a [`FeatureViewer`] over a sequence (or a bare
//! length), appends heterogeneous feature tracks one at a time, and wires
//! its pointer/brush/resize events into the viewer. The viewer lays the
//! tracks out (greedy lane packing for overlapping intervals), draws them
//! declaratively into a retained [`RenderSurface`](scene::RenderSurface)
//! and reflows them in place on every zoom, reset and resize.

pub mod axis;
pub mod color;
pub mod debounce;
pub mod labels;
pub mod level;
pub mod name_axis;
pub mod options;
pub mod scale;
pub mod scene;
pub mod svg_export;
pub mod track;
pub mod track_bond;
pub mod track_interval;
pub mod track_multi_rect;
pub mod track_point;
pub mod track_sequence;
pub mod track_series;
pub mod viewer;
pub mod viewport;

pub use options::{Offset, ViewerOptions};
pub use scene::{RenderSurface, Scene, SharedScene};
pub use track::{TrackData, TrackDescriptor, TrackKind};
pub use viewer::{FeatureViewer, SequenceSource};
pub use viewport::{Extent, ZoomEvent};
