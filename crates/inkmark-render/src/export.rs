//! Flattening the annotated image into a PNG.

use crate::codec;
use crate::rasterize::Rasterizer;
use crate::renderer::{build_scene, RenderContext, Renderer, RendererError};
use ab_glyph::FontArc;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use inkmark_core::raster::RasterError;
use inkmark_core::Editor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to decode source image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Raster layer error: {0}")]
    Raster(#[from] RasterError),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
    #[error("Nothing to export at {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("Text annotations need a font to export")]
    MissingFont,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// The decoded image being annotated.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: RgbaImage,
}

impl SourceImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode an image in any supported format.
    pub fn from_bytes(bytes: &[u8]) -> ExportResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image.to_rgba8()))
    }

    /// Load and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;
        log::debug!(
            "Loaded source image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::new(image.to_rgba8()))
    }

    /// Pixel size of the decoded image.
    pub fn natural_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// A flattened PNG ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedImage {
    /// Write the PNG into `dir` under its file name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.png)?;
        log::info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Composites the source image, the vector layer and the freehand layer.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    font: Option<FontArc>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font used to draw text annotations.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Flatten the editor state over `source` at the editor's display size.
    ///
    /// Layers from bottom to top: the source image scaled to the display
    /// size, the committed annotations without selection highlight or draft,
    /// and the freehand layer. Any failure produces no output, including
    /// text annotations with no font to draw them.
    pub fn export(&self, editor: &Editor, source: &SourceImage) -> ExportResult<ExportedImage> {
        let (width, height) = editor.pixel_size();
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyCanvas { width, height });
        }

        let scene = build_scene(&RenderContext::for_export(editor));
        if scene.has_text() && self.font.is_none() {
            return Err(ExportError::MissingFont);
        }

        let scaled = imageops::resize(source.image(), width, height, FilterType::Triangle);
        let mut canvas = codec::rgba_to_pixmap(&scaled)?;

        let mut vector = Rasterizer::new(width, height)?.with_font(self.font.clone());
        vector.render(&scene)?;
        draw_layer(&mut canvas, vector.pixmap());

        if let Some(raster) = editor.raster() {
            let snapshot = raster.snapshot()?;
            let freehand = codec::decode_png(snapshot.bytes())?;
            draw_layer(&mut canvas, &freehand);
        }

        let png = codec::encode_png(&canvas)?;
        let file_name = editor.config().export_file_name.clone();
        log::info!("Exported {file_name} ({width}x{height}, {} bytes)", png.len());
        Ok(ExportedImage {
            file_name,
            png,
            width,
            height,
        })
    }
}

fn draw_layer(canvas: &mut Pixmap, layer: &Pixmap) {
    canvas.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}
