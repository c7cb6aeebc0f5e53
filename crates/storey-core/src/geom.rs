#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// A node position as stored in the dataset's `layouts` section (`{"x": .., "y": ..}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<LayoutPoint> for Point {
    fn from(p: LayoutPoint) -> Self {
        point(p.x, p.y)
    }
}

/// Converts container-local screen coordinates into canvas (SVG) coordinates.
///
/// Renderers own the real viewport; the core only needs this one translation when placing a
/// new node under the cursor.
pub trait CanvasTranslator {
    fn screen_to_canvas(&self, screen: Point) -> Point;
}

/// Pan/zoom viewport usable when no renderer-provided translator is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan: Vector,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: vector(0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new(pan: Vector, zoom: f64) -> Self {
        Self { pan, zoom }
    }

    /// Canvas → screen transform.
    pub fn to_screen(&self) -> Transform {
        Transform::scale(self.zoom, self.zoom).then_translate(self.pan)
    }
}

impl CanvasTranslator for ViewTransform {
    fn screen_to_canvas(&self, screen: Point) -> Point {
        match self.to_screen().inverse() {
            Some(inv) => inv.transform_point(screen),
            // Zero zoom has no inverse; report a non-finite point so callers reject it.
            None => point(f64::NAN, f64::NAN),
        }
    }
}
