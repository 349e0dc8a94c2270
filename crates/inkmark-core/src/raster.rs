//! Freehand raster layer abstraction.
//!
//! Pen strokes are drawn straight into pixels rather than stored as vector
//! annotations. The editor only needs to draw strokes, capture the layer as
//! an encoded [`Snapshot`] and restore it later, so the pixel backend lives
//! behind [`RasterLayer`].

use crate::annotation::{Rgba, Snapshot};
use kurbo::Point;
use thiserror::Error;

/// Raster layer errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
    #[error("Failed to decode snapshot: {0}")]
    Decode(String),
    #[error("Invalid layer size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for raster layer operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Style of a freehand stroke. Strokes use round caps and joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenStyle {
    pub color: Rgba,
    pub width: f64,
}

/// Pixel surface that receives freehand strokes.
pub trait RasterLayer {
    /// Layer size in pixels.
    fn size(&self) -> (u32, u32);

    /// Encode the current pixels.
    fn snapshot(&self) -> RasterResult<Snapshot>;

    /// Replace the whole layer content with a decoded snapshot.
    ///
    /// On error the layer must be left untouched.
    fn restore(&mut self, snapshot: &Snapshot) -> RasterResult<()>;

    /// Erase every pixel and drop any stroke in progress.
    fn clear(&mut self);

    /// Start a stroke at `point`.
    fn begin_stroke(&mut self, point: Point, style: PenStyle);

    /// Draw the stroke in progress on to `point`.
    fn extend_stroke(&mut self, point: Point);

    /// Finish the stroke in progress.
    fn end_stroke(&mut self);

    /// Whether a stroke is in progress.
    fn is_stroking(&self) -> bool;
}
