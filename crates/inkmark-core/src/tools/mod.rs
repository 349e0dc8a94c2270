//! Tool system: active tool, style context and the draft shape tracker.

use crate::annotation::{Annotation, PaletteColor, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Resize,
    Move,
    Select,
    Text,
    CircleOutline,
    CircleFilled,
    RectOutline,
    RectFilled,
    TriangleOutline,
    TriangleFilled,
    Line,
    Pen,
}

impl ToolKind {
    /// Get all tools in toolbar order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Resize,
            ToolKind::Move,
            ToolKind::Select,
            ToolKind::Text,
            ToolKind::CircleOutline,
            ToolKind::CircleFilled,
            ToolKind::RectOutline,
            ToolKind::RectFilled,
            ToolKind::TriangleOutline,
            ToolKind::TriangleFilled,
            ToolKind::Line,
            ToolKind::Pen,
        ]
    }

    /// Shape committed by this tool, if it is a shape tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::CircleOutline => Some(ShapeKind::CircleOutline),
            ToolKind::CircleFilled => Some(ShapeKind::CircleFilled),
            ToolKind::RectOutline => Some(ShapeKind::RectOutline),
            ToolKind::RectFilled => Some(ShapeKind::RectFilled),
            ToolKind::TriangleOutline => Some(ShapeKind::TriangleOutline),
            ToolKind::TriangleFilled => Some(ShapeKind::TriangleFilled),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Resize
            | ToolKind::Move
            | ToolKind::Select
            | ToolKind::Text
            | ToolKind::Pen => None,
        }
    }

    /// Tools that act on an existing annotation picked by clicking it.
    pub fn is_edit_tool(self) -> bool {
        matches!(self, ToolKind::Resize | ToolKind::Move | ToolKind::Select)
    }

    /// Tools that transform the selection while dragging. Style changes are
    /// refused while one of these is active.
    pub fn is_transform(self) -> bool {
        matches!(self, ToolKind::Resize | ToolKind::Move)
    }

    /// Whether pointer-down starts a draft with this tool.
    pub fn uses_draft(self) -> bool {
        self.shape_kind().is_some() || matches!(self, ToolKind::Text | ToolKind::Move)
    }
}

/// Named pen sizes for freehand strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenWidth {
    #[default]
    Small,
    Medium,
    Big,
}

impl PenWidth {
    pub fn all() -> &'static [PenWidth] {
        &[PenWidth::Small, PenWidth::Medium, PenWidth::Big]
    }

    /// Stroke width in canvas units.
    pub fn stroke_width(self) -> f64 {
        match self {
            PenWidth::Small => 2.0,
            PenWidth::Medium => 6.0,
            PenWidth::Big => 10.0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PenWidth::Small => "Small",
            PenWidth::Medium => "Medium",
            PenWidth::Big => "Big",
        }
    }
}

/// Start/end pair of the shape currently being dragged out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Draft {
    pub start: Option<Point>,
    pub end: Option<Point>,
}

impl Draft {
    /// Begin a draft with both points at `point`.
    pub fn begin(&mut self, point: Point) {
        self.start = Some(point);
        self.end = Some(point);
    }

    pub fn extend(&mut self, point: Point) {
        if self.start.is_some() {
            self.end = Some(point);
        }
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn points(&self) -> Option<(Point, Point)> {
        Some((self.start?, self.end?))
    }

    /// A draft with identical start and end commits nothing.
    pub fn is_degenerate(&self) -> bool {
        match self.points() {
            Some((start, end)) => start == end,
            None => true,
        }
    }
}

/// Manages the current tool, style context and draft.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Color applied to new annotations and pen strokes.
    pub color: PaletteColor,
    /// Width of new pen strokes.
    pub pen_width: PenWidth,
    /// Shape being dragged out, or the move anchor.
    pub draft: Draft,
    /// Whether a pointer drag is in progress.
    drawing: bool,
}

impl ToolManager {
    pub fn new(tool: ToolKind, color: PaletteColor, pen_width: PenWidth) -> Self {
        Self {
            current_tool: tool,
            color,
            pen_width,
            draft: Draft::default(),
            drawing: false,
        }
    }

    /// Set the current tool, abandoning any drag in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a pointer interaction.
    pub fn begin(&mut self, point: Point) {
        if self.current_tool.uses_draft() {
            self.draft.begin(point);
        }
        self.drawing = true;
    }

    /// Extend the draft end while a shape drag is active.
    pub fn update(&mut self, point: Point) {
        if self.drawing && self.current_tool.shape_kind().is_some() {
            self.draft.extend(point);
        }
    }

    /// End the interaction and return the shape to commit, if any.
    ///
    /// Text is not produced here since it needs the user's input.
    pub fn end(&mut self) -> Option<Annotation> {
        let shape = match (self.drawing, self.current_tool.shape_kind()) {
            (true, Some(kind)) if !self.draft.is_degenerate() => self
                .draft
                .points()
                .map(|(start, end)| Annotation::shape(kind, start, end, self.color)),
            _ => None,
        };
        self.cancel();
        shape
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.draft.clear();
        self.drawing = false;
    }

    /// Check if a pointer drag is in progress.
    pub fn is_active(&self) -> bool {
        self.drawing
    }

    /// Shape preview for the draft being dragged out.
    pub fn preview_shape(&self) -> Option<Annotation> {
        let kind = self.current_tool.shape_kind()?;
        let (start, end) = self.draft.points()?;
        Some(Annotation::shape(kind, start, end, self.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(tool: ToolKind) -> ToolManager {
        ToolManager::new(tool, PaletteColor::Red, PenWidth::Small)
    }

    #[test]
    fn test_tool_vocabulary() {
        assert_eq!(ToolKind::all().len(), 12);
        let shape_tools = ToolKind::all()
            .iter()
            .filter(|t| t.shape_kind().is_some())
            .count();
        assert_eq!(shape_tools, 7);
    }

    #[test]
    fn test_pen_widths() {
        let widths: Vec<f64> = PenWidth::all().iter().map(|w| w.stroke_width()).collect();
        assert_eq!(widths, vec![2.0, 6.0, 10.0]);
        let names: Vec<&str> = PenWidth::all().iter().map(|w| w.display_name()).collect();
        assert_eq!(names, vec!["Small", "Medium", "Big"]);
    }

    #[test]
    fn test_tool_interaction() {
        let mut tm = manager(ToolKind::RectFilled);
        assert!(!tm.is_active());

        tm.begin(Point::new(10.0, 10.0));
        assert!(tm.is_active());
        tm.update(Point::new(60.0, 40.0));
        assert!(tm.preview_shape().is_some());

        let shape = tm.end();
        assert_eq!(
            shape,
            Some(Annotation::shape(
                ShapeKind::RectFilled,
                Point::new(10.0, 10.0),
                Point::new(60.0, 40.0),
                PaletteColor::Red,
            ))
        );
        assert!(!tm.is_active());
        assert_eq!(tm.draft, Draft::default());
    }

    #[test]
    fn test_degenerate_drag_commits_nothing() {
        let mut tm = manager(ToolKind::Line);
        tm.begin(Point::new(5.0, 5.0));
        assert!(tm.end().is_none());
        assert_eq!(tm.draft, Draft::default());
    }

    #[test]
    fn test_move_without_press_does_not_extend() {
        let mut tm = manager(ToolKind::CircleOutline);
        tm.update(Point::new(5.0, 5.0));
        assert!(tm.draft.points().is_none());
    }

    #[test]
    fn test_select_tool_no_draft() {
        let mut tm = manager(ToolKind::Select);
        tm.begin(Point::new(0.0, 0.0));
        assert!(tm.draft.start.is_none());
        assert!(tm.end().is_none());
    }

    #[test]
    fn test_cancel_interaction() {
        let mut tm = manager(ToolKind::RectOutline);
        tm.begin(Point::new(0.0, 0.0));
        tm.set_tool(ToolKind::Pen);
        assert!(!tm.is_active());
        assert!(tm.draft.points().is_none());
    }
}
