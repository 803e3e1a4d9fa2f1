//! Viewer construction options.

use crate::viewport::ZoomEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial visible extent. `start` below 1 is clamped (with a warning),
/// not rejected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub start: i64,
    pub end: i64,
}

pub type ZoomCallback = Box<dyn FnMut(&ZoomEvent)>;
pub type HeightCallback = Box<dyn FnMut(f32)>;

/// Options accepted at [`crate::FeatureViewer::create`]. The data fields
/// deserialize from the host's option object; the callbacks are set from
/// code.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerOptions {
    pub offset: Option<Offset>,
    pub show_sequence: bool,
    pub show_axis: bool,
    pub brush_active: bool,
    pub vertical_line: bool,
    /// Minimum gesture length (exclusive) for a brush to commit a zoom.
    pub zoom_max: f64,
    pub animation: bool,
    pub dotted_sequence: bool,
    /// Position readouts skip the sequence letter suffix.
    pub position_without_letter: bool,
    pub unit: String,
    #[serde(skip)]
    pub on_zoom: Option<ZoomCallback>,
    #[serde(skip)]
    pub on_height_changed: Option<HeightCallback>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            offset: None,
            show_sequence: false,
            show_axis: false,
            brush_active: false,
            vertical_line: false,
            zoom_max: 50.0,
            animation: true,
            dotted_sequence: true,
            position_without_letter: false,
            unit: "units".to_string(),
            on_zoom: None,
            on_height_changed: None,
        }
    }
}

impl fmt::Debug for ViewerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerOptions")
            .field("offset", &self.offset)
            .field("show_sequence", &self.show_sequence)
            .field("show_axis", &self.show_axis)
            .field("brush_active", &self.brush_active)
            .field("vertical_line", &self.vertical_line)
            .field("zoom_max", &self.zoom_max)
            .field("animation", &self.animation)
            .field("dotted_sequence", &self.dotted_sequence)
            .field("position_without_letter", &self.position_without_letter)
            .field("unit", &self.unit)
            .field("on_zoom", &self.on_zoom.is_some())
            .field("on_height_changed", &self.on_height_changed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let options = ViewerOptions::default();
        assert_eq!(options.zoom_max, 50.0);
        assert!(options.animation);
        assert!(options.dotted_sequence);
        assert!(!options.show_sequence);
        assert_eq!(options.unit, "units");
    }

    #[test]
    fn test_deserialize_host_option_object() {
        let options: ViewerOptions = serde_json::from_value(serde_json::json!({
            "offset": {"start": 0, "end": 500},
            "showSequence": true,
            "brushActive": true,
            "zoomMax": 20
        }))
        .unwrap();
        assert_eq!(options.offset, Some(Offset { start: 0, end: 500 }));
        assert!(options.show_sequence);
        assert!(options.brush_active);
        assert_eq!(options.zoom_max, 20.0);
        // Untouched fields keep their defaults.
        assert!(options.animation);
    }
}
