//! Editor state and pointer interaction handling.

use crate::annotation::{Annotation, AnnotationPatch, PaletteColor};
use crate::config::EditorConfig;
use crate::input::{CancelPrompt, PointerEvent, TextPrompt};
use crate::raster::{PenStyle, RasterError, RasterLayer};
use crate::selection;
use crate::store::AnnotationStore;
use crate::tools::{Draft, PenWidth, ToolKind, ToolManager};
use kurbo::{Point, Size};
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Raster layer error: {0}")]
    Raster(#[from] RasterError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Runtime editing state for one image.
///
/// Owns the annotation store, the tool context, the single active
/// selection and the freehand raster layer. All mutation goes through the
/// methods here so the selection index never outlives the element it names.
pub struct Editor {
    config: EditorConfig,
    /// Display size of the annotated image.
    size: Size,
    store: AnnotationStore,
    tools: ToolManager,
    selection: Option<usize>,
    raster: Option<Box<dyn RasterLayer>>,
    prompt: Box<dyn TextPrompt>,
}

impl Editor {
    /// Create an editor for an image displayed at `size`.
    pub fn new(config: EditorConfig, size: Size) -> Self {
        let tools = ToolManager::new(
            config.default_tool,
            config.default_color,
            config.default_pen_width,
        );
        Self {
            config,
            size,
            store: AnnotationStore::new(),
            tools,
            selection: None,
            raster: None,
            prompt: Box::new(CancelPrompt),
        }
    }

    /// Attach the freehand raster layer. Pen input is ignored until one is attached.
    ///
    /// The layer must cover the display size pixel for pixel, since pen
    /// coordinates are drawn onto it unscaled.
    pub fn attach_raster(&mut self, raster: Box<dyn RasterLayer>) -> EditorResult<()> {
        let (width, height) = raster.size();
        if (width, height) != self.pixel_size() {
            return Err(RasterError::InvalidSize { width, height }.into());
        }
        self.raster = Some(raster);
        Ok(())
    }

    pub fn with_raster(mut self, raster: Box<dyn RasterLayer>) -> EditorResult<Self> {
        self.attach_raster(raster)?;
        Ok(self)
    }

    /// Install the source of text for the text tool.
    pub fn set_prompt(&mut self, prompt: Box<dyn TextPrompt>) {
        self.prompt = prompt;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Display size rounded to whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.size.width.round() as u32,
            self.size.height.round() as u32,
        )
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn raster(&self) -> Option<&dyn RasterLayer> {
        self.raster.as_deref()
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn color(&self) -> PaletteColor {
        self.tools.color
    }

    pub fn pen_width(&self) -> PenWidth {
        self.tools.pen_width
    }

    pub fn draft(&self) -> &Draft {
        &self.tools.draft
    }

    /// Shape preview for the drag in progress.
    pub fn preview_shape(&self) -> Option<Annotation> {
        self.tools.preview_shape()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    // --- Tool and style context ---

    /// Switch tool. Always clears the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if let Some(raster) = self.raster.as_mut() {
            if raster.is_stroking() {
                raster.end_stroke();
            }
        }
        self.tools.set_tool(tool);
        self.selection = None;
        log::debug!("Tool changed to {tool:?}");
    }

    /// Change the active color.
    ///
    /// With a selection, the selected annotation is recolored too. Refused
    /// while a transform tool is active. Returns whether the color changed.
    pub fn set_color(&mut self, color: PaletteColor) -> bool {
        if self.tools.current_tool.is_transform() {
            return false;
        }
        self.tools.color = color;
        if let Some(index) = self.selection {
            self.store.update_at(index, AnnotationPatch::color(color));
        }
        log::debug!("Color changed to {}", color.name());
        true
    }

    pub fn set_pen_width(&mut self, width: PenWidth) {
        self.tools.pen_width = width;
        log::debug!("Pen width changed to {}", width.display_name());
    }

    // --- Selection ---

    /// Select the annotation at `index`.
    ///
    /// Only edit tools select. Snapshots and out-of-range indices are refused.
    pub fn select(&mut self, index: usize) -> bool {
        let selectable = self.tools.current_tool.is_edit_tool()
            && self.store.get(index).is_some_and(Annotation::is_editable);
        if selectable {
            self.selection = Some(index);
        }
        selectable
    }

    /// Select the topmost annotation under `point`, as a click on it would.
    ///
    /// Only edit tools pick annotations; clicking empty space keeps the
    /// current selection.
    pub fn select_at(&mut self, point: Point) -> Option<usize> {
        if !self.tools.current_tool.is_edit_tool() {
            return None;
        }
        let hit = selection::hit_test(self.store.as_slice(), point, &self.config)?;
        self.selection = Some(hit);
        Some(hit)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // --- Store operations ---

    /// Remove the annotation at `index`.
    ///
    /// A selection at or after `index` would now name a different element,
    /// so it is cleared.
    pub fn remove_at(&mut self, index: usize) -> Option<Annotation> {
        let removed = self.store.remove_at(index)?;
        if self.selection.is_some_and(|selected| selected >= index) {
            self.selection = None;
        }
        log::debug!("Removed annotation {index}");
        Some(removed)
    }

    /// Remove the selected annotation.
    pub fn remove_selected(&mut self) -> Option<Annotation> {
        let index = self.selection.take()?;
        self.remove_at(index)
    }

    /// Remove every annotation and erase the raster layer.
    pub fn remove_all(&mut self) {
        self.store.remove_all();
        self.selection = None;
        self.tools.cancel();
        if let Some(raster) = self.raster.as_mut() {
            raster.clear();
        }
        log::debug!("Removed all annotations");
    }

    /// Remove the last annotation.
    ///
    /// Undoing a freehand snapshot restores the raster layer from it. If the
    /// snapshot cannot be decoded the entry stays in place and the layer is
    /// unchanged. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> EditorResult<bool> {
        let Some(last) = self.store.last() else {
            return Ok(false);
        };
        if let (Annotation::FreehandSnapshot(snapshot), Some(raster)) = (last, self.raster.as_mut())
        {
            if let Err(err) = raster.restore(snapshot) {
                log::warn!("Undo rolled back, raster restore failed: {err}");
                return Err(err.into());
            }
        }
        let index = self.store.len() - 1;
        self.store.undo();
        if self.selection == Some(index) {
            self.selection = None;
        }
        log::debug!("Undid annotation {index}");
        Ok(true)
    }

    // --- Pointer handling ---

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditorResult<()> {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                Ok(())
            }
            PointerEvent::Up { position } => {
                self.pointer_up(position);
                Ok(())
            }
            PointerEvent::Leave => {
                self.pointer_leave();
                Ok(())
            }
        }
    }

    /// Pointer pressed.
    ///
    /// Edit tools first pick the annotation under the pointer. The pen
    /// appends a snapshot of the raster layer before drawing, so the stroke
    /// can be undone.
    pub fn pointer_down(&mut self, position: Point) -> EditorResult<()> {
        if self.tools.current_tool.is_edit_tool() {
            self.select_at(position);
        }
        if self.tools.current_tool == ToolKind::Pen {
            let Some(raster) = self.raster.as_mut() else {
                return Ok(());
            };
            let snapshot = raster.snapshot()?;
            let style = PenStyle {
                color: self.tools.color.rgba(),
                width: self.tools.pen_width.stroke_width(),
            };
            raster.begin_stroke(position, style);
            self.store.append(Annotation::FreehandSnapshot(snapshot));
        }
        self.tools.begin(position);
        Ok(())
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, position: Point) {
        match self.tools.current_tool {
            ToolKind::Pen => {
                if self.tools.is_active() {
                    if let Some(raster) = self.raster.as_mut() {
                        raster.extend_stroke(position);
                    }
                }
            }
            ToolKind::Resize => {
                if let (true, Some(index)) = (self.tools.is_active(), self.selection) {
                    self.store.update_at(index, AnnotationPatch::end(position));
                }
            }
            ToolKind::Move => {
                let Some(anchor) = self.tools.draft.start else {
                    return;
                };
                if let Some(index) = self.selection {
                    let patch = self
                        .store
                        .get(index)
                        .and_then(|annotation| annotation.translation_patch(position - anchor));
                    if let Some(patch) = patch {
                        self.store.update_at(index, patch);
                    }
                }
                self.tools.draft.start = Some(position);
            }
            ToolKind::Select | ToolKind::Text => {}
            _ => self.tools.update(position),
        }
    }

    /// Pointer released. `position` is applied as a final move first.
    pub fn pointer_up(&mut self, position: Point) {
        self.pointer_move(position);
        self.finish(true);
    }

    /// Pointer left the drawing surface. Never commits text.
    pub fn pointer_leave(&mut self) {
        self.finish(false);
    }

    fn finish(&mut self, released: bool) {
        match self.tools.current_tool {
            ToolKind::Pen => {
                if self.tools.is_active() {
                    if let Some(raster) = self.raster.as_mut() {
                        raster.end_stroke();
                    }
                }
                self.tools.cancel();
            }
            ToolKind::Resize | ToolKind::Move => {
                self.selection = None;
                self.tools.cancel();
            }
            ToolKind::Select => self.tools.cancel(),
            ToolKind::Text => {
                let anchor = self.tools.draft.start.filter(|_| self.tools.is_active());
                self.tools.cancel();
                if let (true, Some(anchor)) = (released, anchor) {
                    self.commit_text(anchor);
                }
            }
            _ => {
                if let Some(shape) = self.tools.end() {
                    let index = self.store.append(shape);
                    log::debug!("Committed shape {index}");
                }
            }
        }
    }

    fn commit_text(&mut self, anchor: Point) {
        match self.prompt.request_text() {
            Some(content) if !content.is_empty() => {
                let index = self
                    .store
                    .append(Annotation::text(anchor, content, self.tools.color));
                log::debug!("Committed text {index}");
            }
            _ => log::debug!("Text input cancelled"),
        }
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("size", &self.size)
            .field("annotations", &self.store.len())
            .field("tool", &self.tools.current_tool)
            .field("selection", &self.selection)
            .field("has_raster", &self.raster.is_some())
            .finish()
    }
}
