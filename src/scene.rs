//! Declarative shape model and the retained-surface seam.
//!
//! The viewer never draws pixels; it upserts shapes into a [`RenderSurface`]
//! keyed by stable ids and overwrites them in place on zoom, resize and
//! hover. Clipping to the plot area and sub-pixel rounding are the surface's
//! responsibility, as is honoring (or ignoring) the animation hint.

use crate::color::Rgba;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Stable identity of one retained shape. Ids are allocated once, at first
/// render, and reused for every later geometry update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u64);

#[derive(Clone, Copy, Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }
}

/// Animation hint attached to an upsert. Transitions are purely visual;
/// a later upsert of the same id supersedes any in-flight animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anim {
    Instant,
    /// Animate toward the new geometry over the given duration (ms).
    Animate(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Left-to-right linear gradient.
    Gradient { from: Rgba, to: Rgba },
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    /// Dash/gap lengths; `None` draws solid.
    pub dash: Option<(f32, f32)>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }
}

/// Curve hint for polylines. `StepBefore` steps vertically first;
/// `Monotone` is a shape-preserving cubic through the points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Monotone,
    StepBefore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Paint,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Paint,
        stroke: Option<StrokeStyle>,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: StrokeStyle,
        fill: Paint,
        curve: Curve,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        anchor: Anchor,
        fill: Rgba,
        href: Option<String>,
    },
}

/// Retained-mode drawing target. One viewer owns one surface; upserts are
/// idempotent so re-rendering the same id is always safe.
pub trait RenderSurface {
    fn upsert(&mut self, id: ShapeId, shape: Shape, anim: Anim);
    fn remove(&mut self, id: ShapeId);
    /// Total drawing height in pixels, grown as tracks are appended.
    fn set_height(&mut self, height: f32);
    /// Releases every retained shape; the teardown path.
    fn clear(&mut self);
    /// Current width of the hosting container in pixels.
    fn container_width(&self) -> f32;
}

/// Reference surface: an ordered shape store that hosts can walk to paint
/// with their own 2D stack, or materialize with [`crate::svg_export`].
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: BTreeMap<ShapeId, Shape>,
    width: f32,
    height: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(800.0)
    }
}

impl Scene {
    pub fn new(width: f32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            width,
            height: 0.0,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.nodes.get(&id)
    }

    /// Shapes in draw order (ascending id; later ids draw on top).
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.nodes.iter().map(|(id, shape)| (*id, shape))
    }
}

impl RenderSurface for Scene {
    fn upsert(&mut self, id: ShapeId, shape: Shape, _anim: Anim) {
        self.nodes.insert(id, shape);
    }

    fn remove(&mut self, id: ShapeId) {
        self.nodes.remove(&id);
    }

    fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.height = 0.0;
    }

    fn container_width(&self) -> f32 {
        self.width
    }
}

/// Cheaply cloneable handle over a [`Scene`], so the host can keep reading
/// the shapes it hands to the viewer for drawing.
#[derive(Clone, Debug)]
pub struct SharedScene(Arc<RwLock<Scene>>);

impl Default for SharedScene {
    fn default() -> Self {
        Self::new(800.0)
    }
}

impl SharedScene {
    pub fn new(width: f32) -> Self {
        Self(Arc::new(RwLock::new(Scene::new(width))))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Scene> {
        self.0.read().expect("scene lock poisoned")
    }

    pub fn set_width(&self, width: f32) {
        self.0.write().expect("scene lock poisoned").set_width(width);
    }
}

impl RenderSurface for SharedScene {
    fn upsert(&mut self, id: ShapeId, shape: Shape, anim: Anim) {
        self.0
            .write()
            .expect("scene lock poisoned")
            .upsert(id, shape, anim);
    }

    fn remove(&mut self, id: ShapeId) {
        self.0.write().expect("scene lock poisoned").remove(id);
    }

    fn set_height(&mut self, height: f32) {
        self.0.write().expect("scene lock poisoned").set_height(height);
    }

    fn clear(&mut self) {
        self.0.write().expect("scene lock poisoned").clear();
    }

    fn container_width(&self) -> f32 {
        self.read().container_width()
    }
}
