//! CPU rasterization of scenes with tiny-skia.

use crate::renderer::{Paint, Primitive, RenderResult, Renderer, RendererError, Scene, StrokeStyle};
use ab_glyph::{Font, FontArc, OutlineCurve, ScaleFont};
use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use tiny_skia::{FillRule, PathBuilder, Pixmap, Stroke, Transform};

/// Convert a display-list color into a tiny-skia paint.
pub(crate) fn solid_paint(color: Color) -> tiny_skia::Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

/// Convert a kurbo path into a tiny-skia path.
pub(crate) fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Software renderer painting into a [`Pixmap`].
///
/// Text needs a font. Rendering text without one fails.
pub struct Rasterizer {
    pixmap: Pixmap,
    font: Option<FontArc>,
}

impl Rasterizer {
    /// Create a rasterizer with a transparent target.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RendererError::InvalidSize { width, height })?;
        Ok(Self { pixmap, font: None })
    }

    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn draw_shape(&mut self, path: &tiny_skia::Path, paint: &Paint) {
        match paint {
            Paint::Fill(color) => {
                self.pixmap.fill_path(
                    path,
                    &solid_paint(*color),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            Paint::Stroke(style) => self.stroke(path, style),
        }
    }

    fn stroke(&mut self, path: &tiny_skia::Path, style: &StrokeStyle) {
        let stroke = Stroke {
            width: style.width as f32,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            path,
            &solid_paint(style.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn draw_text(
        &mut self,
        anchor: Point,
        content: &str,
        size: f64,
        fill: Color,
        outline: Option<&StrokeStyle>,
    ) -> RenderResult<()> {
        let Some(font) = self.font.as_ref() else {
            return Err(RendererError::MissingFont(content.to_string()));
        };
        let Some(path) = text_path(font, anchor, content, size as f32) else {
            // Whitespace only.
            return Ok(());
        };
        self.pixmap.fill_path(
            &path,
            &solid_paint(fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        if let Some(style) = outline {
            self.stroke(&path, style);
        }
        Ok(())
    }
}

impl Renderer for Rasterizer {
    fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        for primitive in &scene.primitives {
            match primitive {
                Primitive::Shape { geometry, paint } => {
                    // Zero-area shapes have no path to paint.
                    if let Some(path) = to_skia_path(&geometry.to_path()) {
                        self.draw_shape(&path, paint);
                    }
                }
                Primitive::Text {
                    anchor,
                    content,
                    size,
                    fill,
                    outline,
                } => self.draw_text(*anchor, content, *size, *fill, outline.as_ref())?,
            }
        }
        Ok(())
    }
}

/// Build the glyph outlines of a single line of text starting at the
/// baseline point `anchor`.
fn text_path(font: &FontArc, anchor: Point, content: &str, size: f32) -> Option<tiny_skia::Path> {
    let scaled = font.as_scaled(size);
    let (sx, sy) = (scaled.h_scale_factor(), scaled.v_scale_factor());
    let baseline = anchor.y as f32;
    let mut pen_x = anchor.x as f32;
    let mut prev = None;
    let mut pb = PathBuilder::new();

    for ch in content.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            pen_x += scaled.kern(prev, id);
        }
        if let Some(outline) = font.outline(id) {
            let origin = pen_x;
            // Font units are y-up.
            let map = |p: ab_glyph::Point| (origin + p.x * sx, baseline - p.y * sy);
            let mut last = None;
            for curve in &outline.curves {
                let (start, end) = match curve {
                    OutlineCurve::Line(a, b) => (*a, *b),
                    OutlineCurve::Quad(a, _, c) => (*a, *c),
                    OutlineCurve::Cubic(a, _, _, d) => (*a, *d),
                };
                if last != Some(start) {
                    if last.is_some() {
                        pb.close();
                    }
                    let (x, y) = map(start);
                    pb.move_to(x, y);
                }
                match curve {
                    OutlineCurve::Line(_, b) => {
                        let (x, y) = map(*b);
                        pb.line_to(x, y);
                    }
                    OutlineCurve::Quad(_, b, c) => {
                        let (x1, y1) = map(*b);
                        let (x, y) = map(*c);
                        pb.quad_to(x1, y1, x, y);
                    }
                    OutlineCurve::Cubic(_, b, c, d) => {
                        let (x1, y1) = map(*b);
                        let (x2, y2) = map(*c);
                        let (x, y) = map(*d);
                        pb.cubic_to(x1, y1, x2, y2, x, y);
                    }
                }
                last = Some(end);
            }
            if last.is_some() {
                pb.close();
            }
        }
        pen_x += scaled.h_advance(id);
        prev = Some(id);
    }

    pb.finish()
}
