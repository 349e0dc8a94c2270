//! InkMark Render Library
//!
//! Display list building, CPU rasterization, the pixmap-backed freehand
//! layer and PNG export for InkMark.

pub mod codec;
pub mod export;
mod pixmap_layer;
mod rasterize;
mod renderer;

pub use export::{ExportError, ExportResult, ExportedImage, Exporter, SourceImage};
pub use pixmap_layer::PixmapLayer;
pub use rasterize::Rasterizer;
pub use renderer::{
    build_scene, to_color, Paint, Primitive, RenderContext, RenderResult, Renderer, RendererError,
    Scene, StrokeStyle,
};

// Re-export the font type accepted by the rasterizer and exporter
pub use ab_glyph::FontArc;

#[cfg(test)]
pub(crate) fn fixture_font() -> FontArc {
    FontArc::try_from_slice(include_bytes!("../tests/fixtures/DejaVuSansMono.ttf"))
        .expect("bundled fixture font parses")
}
