//! Picking annotations under the pointer.

use crate::annotation::{Annotation, ShapeKind};
use crate::config::EditorConfig;
use crate::geometry::Geometry;
use kurbo::{Point, Rect};

/// Average glyph advance as a fraction of the font size.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Approximate bounds of a text annotation anchored at its baseline start.
pub fn text_bounds(anchor: Point, content: &str, size: f64) -> Rect {
    let width = content.chars().count() as f64 * size * TEXT_ADVANCE_RATIO;
    Rect::new(anchor.x, anchor.y - size, anchor.x + width, anchor.y + size * 0.25)
}

/// Width of the painted stroke of a shape, or 0 for filled shapes.
pub fn stroke_width(kind: ShapeKind, config: &EditorConfig) -> f64 {
    match kind {
        ShapeKind::Line => config.line_width,
        kind if kind.is_filled() => 0.0,
        _ => config.outline_width,
    }
}

/// Check whether `point` hits the painted area of `annotation`.
///
/// Outline shapes only react on their stroke, filled shapes on their whole
/// area. Freehand snapshots never hit.
pub fn hits(annotation: &Annotation, point: Point, config: &EditorConfig) -> bool {
    let tolerance = config.hit_tolerance;
    match annotation {
        Annotation::Shape {
            kind, start, end, ..
        } => {
            let geometry = Geometry::from_corners(*kind, *start, *end);
            if kind.is_filled() {
                geometry.contains(point) || geometry.outline_distance(point) <= tolerance
            } else {
                geometry.outline_distance(point) <= stroke_width(*kind, config) / 2.0 + tolerance
            }
        }
        Annotation::Text {
            anchor, content, ..
        } => text_bounds(*anchor, content, config.text_size)
            .inflate(tolerance, tolerance)
            .contains(point),
        Annotation::FreehandSnapshot(_) => false,
    }
}

/// Index of the topmost annotation under `point`.
pub fn hit_test(annotations: &[Annotation], point: Point, config: &EditorConfig) -> Option<usize> {
    annotations
        .iter()
        .enumerate()
        .rev()
        .find(|(_, annotation)| hits(annotation, point, config))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{PaletteColor, Snapshot};

    fn shape(kind: ShapeKind, x0: f64, y0: f64, x1: f64, y1: f64) -> Annotation {
        Annotation::shape(kind, Point::new(x0, y0), Point::new(x1, y1), PaletteColor::Red)
    }

    #[test]
    fn test_filled_rect_hit_inside() {
        let config = EditorConfig::default();
        let rect = shape(ShapeKind::RectFilled, 60.0, 40.0, 10.0, 10.0);
        assert!(hits(&rect, Point::new(30.0, 20.0), &config));
        assert!(!hits(&rect, Point::new(100.0, 100.0), &config));
    }

    #[test]
    fn test_outline_rect_hit_on_border_only() {
        let config = EditorConfig::default();
        let rect = shape(ShapeKind::RectOutline, 0.0, 0.0, 100.0, 100.0);
        assert!(hits(&rect, Point::new(50.0, 1.0), &config));
        assert!(!hits(&rect, Point::new(50.0, 50.0), &config));
    }

    #[test]
    fn test_line_hit() {
        let config = EditorConfig::default();
        let line = shape(ShapeKind::Line, 0.0, 0.0, 100.0, 0.0);
        assert!(hits(&line, Point::new(50.0, 6.0), &config));
        assert!(!hits(&line, Point::new(50.0, 20.0), &config));
    }

    #[test]
    fn test_text_hit() {
        let config = EditorConfig::default();
        let text = Annotation::text(Point::new(100.0, 50.0), "Hello", PaletteColor::Black);
        assert!(hits(&text, Point::new(110.0, 40.0), &config));
        assert!(!hits(&text, Point::new(90.0, 100.0), &config));
    }

    #[test]
    fn test_topmost_wins_and_snapshots_skipped() {
        let config = EditorConfig::default();
        let annotations = vec![
            shape(ShapeKind::RectFilled, 0.0, 0.0, 100.0, 100.0),
            shape(ShapeKind::CircleFilled, 50.0, 50.0, 150.0, 150.0),
            Annotation::FreehandSnapshot(Snapshot::new(vec![0u8])),
        ];
        assert_eq!(hit_test(&annotations, Point::new(90.0, 90.0), &config), Some(1));
        assert_eq!(hit_test(&annotations, Point::new(10.0, 10.0), &config), Some(0));
        assert_eq!(hit_test(&annotations, Point::new(400.0, 400.0), &config), None);
    }
}
