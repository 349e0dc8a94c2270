//! Display list building and the renderer trait.

use inkmark_core::annotation::{Annotation, Rgba, ShapeKind};
use inkmark_core::config::EditorConfig;
use inkmark_core::geometry::Geometry;
use inkmark_core::selection;
use inkmark_core::tools::ToolKind;
use inkmark_core::Editor;
use kurbo::{Point, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid render target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("No font configured to draw text {0:?}")]
    MissingFont(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Convert a stored color into a display-list color.
pub fn to_color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Stroke paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

/// How a shape primitive is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke(StrokeStyle),
}

/// One drawing command of the vector layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Shape {
        geometry: Geometry,
        paint: Paint,
    },
    Text {
        /// Baseline start.
        anchor: Point,
        content: String,
        size: f64,
        fill: Color,
        /// Highlight traced around the glyphs.
        outline: Option<StrokeStyle>,
    },
}

/// Display list for the vector layer, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            primitives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Whether any primitive needs a font.
    pub fn has_text(&self) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::Text { .. }))
    }

    fn push_shape(&mut self, geometry: Geometry, paint: Paint) {
        self.primitives.push(Primitive::Shape { geometry, paint });
    }
}

/// Context for building one scene.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a Editor,
    /// Draw the selection highlight.
    pub show_selection: bool,
    /// Draw the shape being dragged out.
    pub show_draft: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a context for on-screen display.
    pub fn new(editor: &'a Editor) -> Self {
        Self {
            editor,
            show_selection: true,
            show_draft: true,
        }
    }

    /// Create a context for export: committed annotations only.
    pub fn for_export(editor: &'a Editor) -> Self {
        Self {
            editor,
            show_selection: false,
            show_draft: false,
        }
    }
}

/// Derive the vector layer display list from the editor state.
///
/// The selection highlight is only drawn while the select tool is active.
/// Freehand snapshots live on the raster layer and emit nothing.
pub fn build_scene(ctx: &RenderContext) -> Scene {
    let editor = ctx.editor;
    let config = editor.config();
    let selected = editor
        .selection()
        .filter(|_| ctx.show_selection && editor.tool() == ToolKind::Select);

    let mut scene = Scene::new(editor.size());
    for (index, annotation) in editor.annotations().iter().enumerate() {
        push_annotation(&mut scene, annotation, selected == Some(index), config);
    }

    if ctx.show_draft {
        if let Some(preview) = editor.preview_shape() {
            push_annotation(&mut scene, &preview, false, config);
        }
    }

    scene
}

fn push_annotation(scene: &mut Scene, annotation: &Annotation, selected: bool, config: &EditorConfig) {
    let highlight = to_color(config.highlight_color);
    match annotation {
        Annotation::Shape {
            kind,
            start,
            end,
            color,
        } => {
            let geometry = Geometry::from_corners(*kind, *start, *end);
            let color = to_color(color.rgba());
            if kind.is_filled() {
                scene.push_shape(geometry, Paint::Fill(color));
                if selected {
                    scene.push_shape(
                        geometry,
                        Paint::Stroke(StrokeStyle {
                            color: highlight,
                            width: config.filled_highlight_width,
                        }),
                    );
                }
            } else {
                if selected {
                    let width = if *kind == ShapeKind::Line {
                        config.line_highlight_width
                    } else {
                        config.outline_highlight_width
                    };
                    scene.push_shape(
                        geometry,
                        Paint::Stroke(StrokeStyle {
                            color: highlight,
                            width,
                        }),
                    );
                }
                scene.push_shape(
                    geometry,
                    Paint::Stroke(StrokeStyle {
                        color,
                        width: selection::stroke_width(*kind, config),
                    }),
                );
            }
        }
        Annotation::Text {
            anchor,
            color,
            content,
        } => scene.primitives.push(Primitive::Text {
            anchor: *anchor,
            content: content.clone(),
            size: config.text_size,
            fill: to_color(color.rgba()),
            outline: selected.then_some(StrokeStyle {
                color: highlight,
                width: config.text_highlight_width,
            }),
        }),
        Annotation::FreehandSnapshot(_) => {}
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Paint a scene on top of the current target content.
    fn render(&mut self, scene: &Scene) -> RenderResult<()>;

    /// Build the scene for `ctx` and paint it.
    fn render_context(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.render(&build_scene(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkmark_core::annotation::PaletteColor;
    use inkmark_core::input::PointerEvent;
    use kurbo::Rect;

    fn editor() -> Editor {
        Editor::new(EditorConfig::default(), Size::new(200.0, 100.0))
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor
            .handle_pointer(PointerEvent::Down { position: from })
            .unwrap();
        editor.handle_pointer(PointerEvent::Up { position: to }).unwrap();
    }

    fn paints(scene: &Scene) -> Vec<Paint> {
        scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Shape { paint, .. } => Some(*paint),
                Primitive::Text { .. } => None,
            })
            .collect()
    }

    fn orange() -> Color {
        to_color(Rgba::orange())
    }

    #[test]
    fn test_outline_shape_stroke_width() {
        let mut editor = editor();
        editor.set_tool(ToolKind::RectOutline);
        editor.set_color(PaletteColor::Blue);
        drag(&mut editor, Point::new(60.0, 40.0), Point::new(10.0, 10.0));

        let scene = build_scene(&RenderContext::new(&editor));
        assert_eq!(scene.size, Size::new(200.0, 100.0));
        assert_eq!(
            scene.primitives,
            vec![Primitive::Shape {
                geometry: Geometry::Rect(Rect::new(10.0, 10.0, 60.0, 40.0)),
                paint: Paint::Stroke(StrokeStyle {
                    color: to_color(PaletteColor::Blue.rgba()),
                    width: 5.0,
                }),
            }]
        );
    }

    #[test]
    fn test_selected_line_draws_halo_beneath() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Line);
        drag(&mut editor, Point::new(0.0, 50.0), Point::new(100.0, 50.0));
        editor.set_tool(ToolKind::Select);
        editor.select_at(Point::new(50.0, 50.0));

        let scene = build_scene(&RenderContext::new(&editor));
        assert_eq!(
            paints(&scene),
            vec![
                Paint::Stroke(StrokeStyle {
                    color: orange(),
                    width: 15.0,
                }),
                Paint::Stroke(StrokeStyle {
                    color: to_color(PaletteColor::Black.rgba()),
                    width: 10.0,
                }),
            ]
        );
    }

    #[test]
    fn test_selected_filled_shape_outlined_on_top() {
        let mut editor = editor();
        editor.set_tool(ToolKind::CircleFilled);
        drag(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        editor.set_tool(ToolKind::Select);
        assert!(editor.select(0));

        let scene = build_scene(&RenderContext::new(&editor));
        assert_eq!(
            paints(&scene),
            vec![
                Paint::Fill(to_color(PaletteColor::Black.rgba())),
                Paint::Stroke(StrokeStyle {
                    color: orange(),
                    width: 3.0,
                }),
            ]
        );
    }

    #[test]
    fn test_selected_text_outline() {
        let mut editor = editor();
        editor.set_prompt(Box::new(|| Some("Hello".to_string())));
        editor.set_tool(ToolKind::Text);
        drag(&mut editor, Point::new(100.0, 50.0), Point::new(100.0, 50.0));
        editor.set_tool(ToolKind::Select);
        assert!(editor.select(0));

        let scene = build_scene(&RenderContext::new(&editor));
        match &scene.primitives[..] {
            [Primitive::Text {
                anchor,
                content,
                outline,
                ..
            }] => {
                assert_eq!(*anchor, Point::new(100.0, 50.0));
                assert_eq!(content, "Hello");
                assert_eq!(
                    *outline,
                    Some(StrokeStyle {
                        color: orange(),
                        width: 1.0,
                    })
                );
            }
            other => panic!("unexpected primitives {other:?}"),
        }
    }

    #[test]
    fn test_export_context_hides_selection_and_draft() {
        let mut editor = editor();
        editor.set_tool(ToolKind::RectOutline);
        drag(&mut editor, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
        editor.set_tool(ToolKind::Select);
        assert!(editor.select(0));

        let on_screen = build_scene(&RenderContext::new(&editor));
        let exported = build_scene(&RenderContext::for_export(&editor));
        assert_eq!(on_screen.primitives.len(), 2);
        assert_eq!(exported.primitives.len(), 1);

        editor.set_tool(ToolKind::Line);
        editor
            .handle_pointer(PointerEvent::Down {
                position: Point::new(0.0, 0.0),
            })
            .unwrap();
        editor
            .handle_pointer(PointerEvent::Move {
                position: Point::new(30.0, 30.0),
            })
            .unwrap();
        assert_eq!(build_scene(&RenderContext::new(&editor)).primitives.len(), 2);
        assert_eq!(
            build_scene(&RenderContext::for_export(&editor)).primitives.len(),
            1
        );
    }

    #[test]
    fn test_no_halo_outside_select_tool() {
        let mut editor = editor();
        editor.set_tool(ToolKind::RectOutline);
        drag(&mut editor, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
        editor.set_tool(ToolKind::Resize);
        editor
            .handle_pointer(PointerEvent::Down {
                position: Point::new(10.0, 20.0),
            })
            .unwrap();
        assert_eq!(editor.selection(), Some(0));
        assert_eq!(build_scene(&RenderContext::new(&editor)).primitives.len(), 1);
    }

    #[test]
    fn test_snapshot_emits_nothing() {
        let mut editor = editor();
        editor
            .attach_raster(Box::new(crate::PixmapLayer::new(200, 100).unwrap()))
            .unwrap();
        editor.set_tool(ToolKind::Pen);
        drag(&mut editor, Point::new(5.0, 5.0), Point::new(50.0, 50.0));
        assert_eq!(editor.annotations().len(), 1);
        assert!(build_scene(&RenderContext::new(&editor)).is_empty());
    }
}
