//! tiny-skia backed freehand layer.

use crate::codec;
use crate::rasterize::solid_paint;
use crate::renderer::to_color;
use inkmark_core::annotation::Snapshot;
use inkmark_core::raster::{PenStyle, RasterError, RasterLayer, RasterResult};
use kurbo::Point;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    last: Point,
    style: PenStyle,
}

/// Freehand layer drawing round-capped strokes into a transparent pixmap.
pub struct PixmapLayer {
    pixmap: Pixmap,
    stroke: Option<ActiveStroke>,
}

impl PixmapLayer {
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            stroke: None,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn dot(&mut self, point: Point, style: PenStyle) {
        let radius = (style.width / 2.0) as f32;
        if let Some(path) = PathBuilder::from_circle(point.x as f32, point.y as f32, radius) {
            self.pixmap.fill_path(
                &path,
                &solid_paint(to_color(style.color)),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn segment(&mut self, from: Point, to: Point, style: PenStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &solid_paint(to_color(style.color)),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

impl RasterLayer for PixmapLayer {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn snapshot(&self) -> RasterResult<Snapshot> {
        codec::encode_png(&self.pixmap).map(Snapshot::new)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> RasterResult<()> {
        // Decode fully before touching the current pixels.
        let decoded = codec::decode_png(snapshot.bytes())?;
        self.pixmap.fill(Color::TRANSPARENT);
        self.pixmap.draw_pixmap(
            0,
            0,
            decoded.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        log::debug!("Restored raster layer from {} byte snapshot", snapshot.len());
        Ok(())
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.stroke = None;
    }

    fn begin_stroke(&mut self, point: Point, style: PenStyle) {
        self.dot(point, style);
        self.stroke = Some(ActiveStroke { last: point, style });
    }

    fn extend_stroke(&mut self, point: Point) {
        let Some(active) = self.stroke else {
            return;
        };
        self.segment(active.last, point, active.style);
        self.stroke = Some(ActiveStroke {
            last: point,
            ..active
        });
    }

    fn end_stroke(&mut self) {
        self.stroke = None;
    }

    fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkmark_core::annotation::{PaletteColor, Rgba};

    fn style() -> PenStyle {
        PenStyle {
            color: PaletteColor::Blue.rgba(),
            width: 10.0,
        }
    }

    fn alpha_at(layer: &PixmapLayer, x: u32, y: u32) -> u8 {
        layer.pixmap().pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn test_stroke_draws_round_segment() {
        let mut layer = PixmapLayer::new(100, 50).unwrap();
        layer.begin_stroke(Point::new(10.0, 25.0), style());
        assert!(layer.is_stroking());
        layer.extend_stroke(Point::new(90.0, 25.0));
        layer.end_stroke();
        assert!(!layer.is_stroking());

        let c = layer.pixmap().pixel(50, 25).unwrap().demultiply();
        assert_eq!([c.red(), c.green(), c.blue(), c.alpha()], [0, 0, 255, 255]);
        // Round cap extends past the end point.
        assert_eq!(alpha_at(&layer, 93, 25), 255);
        assert_eq!(alpha_at(&layer, 50, 5), 0);
    }

    #[test]
    fn test_extend_without_stroke_draws_nothing() {
        let mut layer = PixmapLayer::new(20, 20).unwrap();
        layer.extend_stroke(Point::new(10.0, 10.0));
        assert!(layer.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut layer = PixmapLayer::new(60, 60).unwrap();
        layer.begin_stroke(Point::new(10.0, 10.0), style());
        layer.end_stroke();
        let snapshot = layer.snapshot().unwrap();

        layer.begin_stroke(
            Point::new(40.0, 40.0),
            PenStyle {
                color: Rgba::opaque(255, 0, 0),
                width: 6.0,
            },
        );
        layer.end_stroke();
        assert_eq!(alpha_at(&layer, 40, 40), 255);

        layer.restore(&snapshot).unwrap();
        assert_eq!(alpha_at(&layer, 40, 40), 0);
        assert_eq!(alpha_at(&layer, 10, 10), 255);
    }

    #[test]
    fn test_failed_restore_leaves_pixels() {
        let mut layer = PixmapLayer::new(30, 30).unwrap();
        layer.begin_stroke(Point::new(15.0, 15.0), style());
        layer.end_stroke();
        let before = layer.pixmap().data().to_vec();

        let err = layer.restore(&Snapshot::new(b"not png".to_vec())).unwrap_err();
        assert!(matches!(err, RasterError::Decode(_)));
        assert_eq!(layer.pixmap().data(), before.as_slice());
    }

    #[test]
    fn test_clear() {
        let mut layer = PixmapLayer::new(30, 30).unwrap();
        layer.begin_stroke(Point::new(15.0, 15.0), style());
        layer.clear();
        assert!(!layer.is_stroking());
        assert_eq!(alpha_at(&layer, 15, 15), 0);
        assert_eq!(layer.size(), (30, 30));
    }
}
