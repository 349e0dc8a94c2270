//! Annotation records held by the store.

use crate::geometry::Geometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Highlight color used for the selection halo (CSS `orange`).
    pub const fn orange() -> Self {
        Self::opaque(255, 165, 0)
    }
}

/// The fixed color palette offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    #[default]
    Black,
    Red,
    Yellow,
    Green,
    Blue,
}

impl PaletteColor {
    /// Get all palette entries in toolbar order.
    pub fn all() -> &'static [PaletteColor] {
        &[
            PaletteColor::Black,
            PaletteColor::Red,
            PaletteColor::Yellow,
            PaletteColor::Green,
            PaletteColor::Blue,
        ]
    }

    /// RGB value, matching the CSS named color of the same name.
    pub fn rgba(self) -> Rgba {
        match self {
            PaletteColor::Black => Rgba::opaque(0, 0, 0),
            PaletteColor::Red => Rgba::opaque(255, 0, 0),
            PaletteColor::Yellow => Rgba::opaque(255, 255, 0),
            PaletteColor::Green => Rgba::opaque(0, 128, 0),
            PaletteColor::Blue => Rgba::opaque(0, 0, 255),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Black => "black",
            PaletteColor::Red => "red",
            PaletteColor::Yellow => "yellow",
            PaletteColor::Green => "green",
            PaletteColor::Blue => "blue",
        }
    }
}

/// Kind of a two-corner shape annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    CircleOutline,
    CircleFilled,
    RectOutline,
    RectFilled,
    TriangleOutline,
    TriangleFilled,
    Line,
}

impl ShapeKind {
    /// Whether the shape is painted as a solid fill rather than a stroke.
    pub fn is_filled(self) -> bool {
        matches!(
            self,
            ShapeKind::CircleFilled | ShapeKind::RectFilled | ShapeKind::TriangleFilled
        )
    }
}

/// PNG-encoded capture of the freehand raster layer.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    bytes: Arc<[u8]>,
}

impl Snapshot {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// The encoded image data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One user-created mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// A two-corner shape. Corners are unordered.
    Shape {
        kind: ShapeKind,
        start: Point,
        end: Point,
        color: PaletteColor,
    },
    /// A text label anchored at its baseline start.
    Text {
        anchor: Point,
        color: PaletteColor,
        content: String,
    },
    /// State of the freehand layer captured when a pen stroke began.
    FreehandSnapshot(Snapshot),
}

impl Annotation {
    pub fn shape(kind: ShapeKind, start: Point, end: Point, color: PaletteColor) -> Self {
        Annotation::Shape {
            kind,
            start,
            end,
            color,
        }
    }

    pub fn text(anchor: Point, content: impl Into<String>, color: PaletteColor) -> Self {
        Annotation::Text {
            anchor,
            color,
            content: content.into(),
        }
    }

    /// Whether this entry can be selected, moved, resized or recolored.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Annotation::FreehandSnapshot(_))
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Annotation::FreehandSnapshot(_))
    }

    pub fn color(&self) -> Option<PaletteColor> {
        match self {
            Annotation::Shape { color, .. } | Annotation::Text { color, .. } => Some(*color),
            Annotation::FreehandSnapshot(_) => None,
        }
    }

    /// Normalized geometry of a shape annotation.
    pub fn geometry(&self) -> Option<Geometry> {
        match self {
            Annotation::Shape {
                kind, start, end, ..
            } => Some(Geometry::from_corners(*kind, *start, *end)),
            _ => None,
        }
    }

    /// Patch that translates every coordinate of this annotation by `delta`.
    ///
    /// Text moves its anchor, shapes move both corners. Snapshots have no
    /// coordinates and yield `None`.
    pub fn translation_patch(&self, delta: Vec2) -> Option<AnnotationPatch> {
        match self {
            Annotation::Shape { start, end, .. } => Some(AnnotationPatch {
                start: Some(*start + delta),
                end: Some(*end + delta),
                ..Default::default()
            }),
            Annotation::Text { anchor, .. } => Some(AnnotationPatch {
                start: Some(*anchor + delta),
                ..Default::default()
            }),
            Annotation::FreehandSnapshot(_) => None,
        }
    }

    /// Merge a patch into this annotation. Returns false for snapshots.
    pub fn apply(&mut self, patch: &AnnotationPatch) -> bool {
        match self {
            Annotation::Shape {
                start, end, color, ..
            } => {
                if let Some(c) = patch.color {
                    *color = c;
                }
                if let Some(p) = patch.start {
                    *start = p;
                }
                if let Some(p) = patch.end {
                    *end = p;
                }
                true
            }
            Annotation::Text { anchor, color, .. } => {
                if let Some(c) = patch.color {
                    *color = c;
                }
                // Text has no second corner.
                if let Some(p) = patch.start {
                    *anchor = p;
                }
                true
            }
            Annotation::FreehandSnapshot(_) => false,
        }
    }
}

/// Partial update merged into an annotation by [`crate::AnnotationStore::update_at`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnnotationPatch {
    pub color: Option<PaletteColor>,
    /// First corner, or the anchor of a text annotation.
    pub start: Option<Point>,
    /// Second corner. Ignored by text annotations.
    pub end: Option<Point>,
}

impl AnnotationPatch {
    pub fn color(color: PaletteColor) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn end(point: Point) -> Self {
        Self {
            end: Some(point),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Annotation {
        Annotation::shape(
            ShapeKind::RectOutline,
            Point::new(10.0, 10.0),
            Point::new(60.0, 40.0),
            PaletteColor::Red,
        )
    }

    #[test]
    fn test_palette_rgba() {
        assert_eq!(PaletteColor::Green.rgba(), Rgba::opaque(0, 128, 0));
        assert_eq!(PaletteColor::all().len(), 5);
        assert_eq!(PaletteColor::Yellow.name(), "yellow");
    }

    #[test]
    fn test_translation_patch_moves_both_corners() {
        let mut shape = rect();
        let patch = shape.translation_patch(Vec2::new(5.0, -5.0)).unwrap();
        assert!(shape.apply(&patch));
        assert_eq!(
            shape,
            Annotation::shape(
                ShapeKind::RectOutline,
                Point::new(15.0, 5.0),
                Point::new(65.0, 35.0),
                PaletteColor::Red,
            )
        );
    }

    #[test]
    fn test_text_ignores_second_corner() {
        let mut text = Annotation::text(Point::new(100.0, 50.0), "Hello", PaletteColor::Black);
        assert!(text.apply(&AnnotationPatch::end(Point::new(1.0, 1.0))));
        assert_eq!(
            text,
            Annotation::text(Point::new(100.0, 50.0), "Hello", PaletteColor::Black)
        );

        let patch = text.translation_patch(Vec2::new(1.0, 2.0)).unwrap();
        assert!(patch.end.is_none());
        text.apply(&patch);
        assert_eq!(
            text,
            Annotation::text(Point::new(101.0, 52.0), "Hello", PaletteColor::Black)
        );
    }

    #[test]
    fn test_snapshot_is_not_editable() {
        let mut snap = Annotation::FreehandSnapshot(Snapshot::new(vec![1u8, 2, 3]));
        assert!(!snap.is_editable());
        assert!(snap.translation_patch(Vec2::new(1.0, 1.0)).is_none());
        assert!(!snap.apply(&AnnotationPatch::color(PaletteColor::Blue)));
        assert!(snap.color().is_none());
        assert!(snap.geometry().is_none());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&rect()).unwrap();
        assert!(json.contains("\"type\":\"shape\""));
        let back: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect());
    }
}
