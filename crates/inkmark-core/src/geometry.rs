//! Normalized geometry derived from two unordered corners.

use crate::annotation::ShapeKind;
use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as KurboShape};

/// Drawable geometry of a shape annotation.
///
/// Every variant is derived through [`Rect::from_points`], so widths and
/// heights are never negative regardless of drag direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Circle(Circle),
    Rect(Rect),
    /// Apex, bottom-left, bottom-right.
    Triangle([Point; 3]),
    Line(Line),
}

impl Geometry {
    /// Derive the geometry for `kind` from two drag corners.
    pub fn from_corners(kind: ShapeKind, start: Point, end: Point) -> Self {
        let bounds = Rect::from_points(start, end);
        match kind {
            ShapeKind::CircleOutline | ShapeKind::CircleFilled => {
                let radius = bounds.width().max(bounds.height()) / 2.0;
                Geometry::Circle(Circle::new(bounds.center(), radius))
            }
            ShapeKind::RectOutline | ShapeKind::RectFilled => Geometry::Rect(bounds),
            ShapeKind::TriangleOutline | ShapeKind::TriangleFilled => Geometry::Triangle([
                Point::new(bounds.center().x, bounds.y0),
                Point::new(bounds.x0, bounds.y1),
                Point::new(bounds.x1, bounds.y1),
            ]),
            ShapeKind::Line => Geometry::Line(Line::new(start, end)),
        }
    }

    /// Bounding box of the geometry (without stroke width).
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Rect(r) => *r,
            Geometry::Triangle([a, b, c]) => Rect::from_points(*a, *b).union_pt(*c),
            Geometry::Line(l) => Rect::from_points(l.p0, l.p1),
        }
    }

    /// Path representation for fill containment and rasterization.
    pub fn to_path(&self) -> BezPath {
        match self {
            Geometry::Circle(c) => c.to_path(0.1),
            Geometry::Rect(r) => r.to_path(0.1),
            Geometry::Triangle([a, b, c]) => {
                let mut path = BezPath::new();
                path.move_to(*a);
                path.line_to(*b);
                path.line_to(*c);
                path.close_path();
                path
            }
            Geometry::Line(l) => {
                let mut path = BezPath::new();
                path.move_to(l.p0);
                path.line_to(l.p1);
                path
            }
        }
    }

    /// Whether `point` lies inside the filled area.
    pub fn contains(&self, point: Point) -> bool {
        match self {
            Geometry::Circle(c) => c.contains(point),
            Geometry::Rect(r) => r.contains(point) || on_rect_edge(*r, point),
            Geometry::Triangle(_) => self.to_path().contains(point),
            Geometry::Line(_) => false,
        }
    }

    /// Distance from `point` to the outline of the geometry.
    pub fn outline_distance(&self, point: Point) -> f64 {
        match self {
            Geometry::Circle(c) => ((point - c.center).hypot() - c.radius).abs(),
            Geometry::Rect(r) => point_to_polyline_dist(
                point,
                &[
                    Point::new(r.x0, r.y0),
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                    Point::new(r.x0, r.y0),
                ],
            ),
            Geometry::Triangle([a, b, c]) => point_to_polyline_dist(point, &[*a, *b, *c, *a]),
            Geometry::Line(l) => point_to_segment_dist(point, l.p0, l.p1),
        }
    }
}

// `Rect::contains` is half-open; treat the max edges as inside too.
fn on_rect_edge(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
