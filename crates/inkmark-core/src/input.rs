//! Pointer events delivered to the editor and the text prompt seam.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The pointer left the drawing surface.
    Leave,
}

/// Source of text for the text tool.
///
/// Returning `None` means the user cancelled.
pub trait TextPrompt {
    fn request_text(&mut self) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_text(&mut self) -> Option<String> {
        self()
    }
}

/// Prompt that always cancels. Used until a real prompt is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelPrompt;

impl TextPrompt for CancelPrompt {
    fn request_text(&mut self) -> Option<String> {
        None
    }
}
