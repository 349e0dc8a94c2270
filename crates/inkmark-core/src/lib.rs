//! InkMark Core Library
//!
//! Platform-agnostic annotation model and editing logic for marking up a
//! single image with shapes, text and freehand strokes.

pub mod annotation;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod raster;
pub mod selection;
pub mod store;
pub mod tools;

pub use annotation::{Annotation, AnnotationPatch, PaletteColor, Rgba, ShapeKind, Snapshot};
pub use config::{ConfigError, EditorConfig, DEFAULT_EXPORT_FILE_NAME};
pub use editor::{Editor, EditorError, EditorResult};
pub use geometry::Geometry;
pub use input::{CancelPrompt, PointerEvent, TextPrompt};
pub use raster::{PenStyle, RasterError, RasterLayer, RasterResult};
pub use store::AnnotationStore;
pub use tools::{Draft, PenWidth, ToolKind, ToolManager};

// Re-export kurbo for convenience
pub use kurbo;
