//! Materializes a retained [`Scene`] into a standalone SVG document.

use crate::color::Rgba;
use crate::scene::{Anchor as TextAnchor, Curve, Paint, RenderSurface, Scene, Shape, ShapeId};
use itertools::Itertools;
use svg::node::element::path::Data;
use svg::node::element::{
    Anchor, Definitions, LinearGradient, Path, Polygon, Rectangle, Stop, Text,
};
use svg::Document;

pub fn scene_to_svg(scene: &Scene) -> String {
    let width = scene.container_width();
    let height = scene.height().max(1.0);
    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        );

    let mut defs = Definitions::new();
    let mut have_defs = false;
    for (id, shape) in scene.shapes() {
        if let Some(gradient) = gradient_def(id, shape) {
            defs = defs.add(gradient);
            have_defs = true;
        }
    }
    if have_defs {
        doc = doc.add(defs);
    }

    for (id, shape) in scene.shapes() {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                if matches!(fill, Paint::None) {
                    continue;
                }
                doc = doc.add(
                    Rectangle::new()
                        .set("x", *x)
                        .set("y", *y)
                        .set("width", *width)
                        .set("height", *height)
                        .set("fill", paint_attr(id, fill)),
                );
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                let mut node = Polygon::new()
                    .set("points", points_attr(points))
                    .set("fill", paint_attr(id, fill));
                if let Some(stroke) = stroke {
                    node = node
                        .set("stroke", stroke.color.to_hex())
                        .set("stroke-width", stroke.width);
                }
                doc = doc.add(node);
            }
            Shape::Polyline {
                points,
                stroke,
                fill,
                curve,
            } => {
                let data = polyline_data(points, *curve);
                let mut node = Path::new()
                    .set("d", data)
                    .set("fill", paint_attr(id, fill))
                    .set("stroke", stroke.color.to_hex())
                    .set("stroke-width", stroke.width);
                if let Some((dash, gap)) = stroke.dash {
                    node = node.set("stroke-dasharray", format!("{dash},{gap}"));
                }
                doc = doc.add(node);
            }
            Shape::Text {
                x,
                y,
                text,
                size,
                anchor,
                fill,
                href,
            } => {
                let node = Text::new(text.clone())
                    .set("x", *x)
                    .set("y", *y)
                    .set("text-anchor", anchor_attr(*anchor))
                    .set("font-family", "monospace")
                    .set("font-size", *size)
                    .set("fill", fill.to_hex());
                match href {
                    Some(url) => doc = doc.add(Anchor::new().set("href", url.as_str()).add(node)),
                    None => doc = doc.add(node),
                }
            }
        }
    }

    doc.to_string()
}

fn gradient_id(id: ShapeId) -> String {
    format!("grad{}", id.0)
}

fn gradient_def(id: ShapeId, shape: &Shape) -> Option<LinearGradient> {
    let paint = match shape {
        Shape::Rect { fill, .. } => fill,
        Shape::Polygon { fill, .. } => fill,
        Shape::Polyline { fill, .. } => fill,
        Shape::Text { .. } => return None,
    };
    let Paint::Gradient { from, to } = paint else {
        return None;
    };
    Some(
        LinearGradient::new()
            .set("id", gradient_id(id))
            .set("x1", "0")
            .set("y1", "0")
            .set("x2", "1")
            .set("y2", "0")
            .add(stop(0.0, *from))
            .add(stop(1.0, *to)),
    )
}

fn stop(offset: f32, color: Rgba) -> Stop {
    Stop::new()
        .set("offset", offset)
        .set("stop-color", color.to_hex())
        .set("stop-opacity", color.a as f32 / 255.0)
}

fn paint_attr(id: ShapeId, paint: &Paint) -> String {
    match paint {
        Paint::Solid(color) => color.to_hex(),
        Paint::Gradient { .. } => format!("url(#{})", gradient_id(id)),
        Paint::None => "none".to_string(),
    }
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points.iter().map(|(x, y)| format!("{x},{y}")).join(" ")
}

fn polyline_data(points: &[(f32, f32)], curve: Curve) -> Data {
    let mut data = Data::new();
    let Some(&(x0, y0)) = points.first() else {
        return data;
    };
    data = data.move_to((x0, y0));
    match curve {
        Curve::Linear => {
            for &(x, y) in &points[1..] {
                data = data.line_to((x, y));
            }
        }
        Curve::StepBefore => {
            let mut prev_x = x0;
            for &(x, y) in &points[1..] {
                data = data.line_to((prev_x, y)).line_to((x, y));
                prev_x = x;
            }
        }
        Curve::Monotone => {
            for segment in monotone_segments(points) {
                data = data.cubic_curve_to(segment);
            }
        }
    }
    data
}

/// Shape-preserving cubic interpolation (Fritsch–Carlson tangents), emitted
/// as one cubic Bézier per input interval.
fn monotone_segments(points: &[(f32, f32)]) -> Vec<(f32, f32, f32, f32, f32, f32)> {
    let n = points.len();
    if n < 2 {
        return vec![];
    }
    let mut slopes = Vec::with_capacity(n - 1);
    for w in points.windows(2) {
        let h = w[1].0 - w[0].0;
        slopes.push(if h.abs() < f32::EPSILON {
            0.0
        } else {
            (w[1].1 - w[0].1) / h
        });
    }
    let mut tangents = vec![0.0f32; n];
    tangents[0] = slopes[0];
    tangents[n - 1] = slopes[n - 2];
    for i in 1..n - 1 {
        tangents[i] = if slopes[i - 1] * slopes[i] <= 0.0 {
            0.0
        } else {
            (slopes[i - 1] + slopes[i]) / 2.0
        };
    }
    for i in 0..n - 1 {
        if slopes[i].abs() < f32::EPSILON {
            tangents[i] = 0.0;
            tangents[i + 1] = 0.0;
            continue;
        }
        let a = tangents[i] / slopes[i];
        let b = tangents[i + 1] / slopes[i];
        let norm = a * a + b * b;
        if norm > 9.0 {
            let t = 3.0 / norm.sqrt();
            tangents[i] = t * a * slopes[i];
            tangents[i + 1] = t * b * slopes[i];
        }
    }
    let mut segments = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let h = (x1 - x0) / 3.0;
        segments.push((
            x0 + h,
            y0 + tangents[i] * h,
            x1 - h,
            y1 - tangents[i + 1] * h,
            x1,
            y1,
        ));
    }
    segments
}
