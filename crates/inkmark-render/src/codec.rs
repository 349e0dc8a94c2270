//! PNG encoding and decoding of pixmaps.
//!
//! tiny-skia stores premultiplied pixels while PNG stores straight alpha, so
//! both directions convert.

use image::{ImageFormat, RgbaImage};
use inkmark_core::raster::{RasterError, RasterResult};
use tiny_skia::{ColorU8, Pixmap};

/// Encode a pixmap as an RGBA8 PNG.
pub fn encode_png(pixmap: &Pixmap) -> RasterResult<Vec<u8>> {
    let rgba_data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RasterError::Encode(format!("PNG header: {e}")))?;
        writer
            .write_image_data(&rgba_data)
            .map_err(|e| RasterError::Encode(format!("PNG data: {e}")))?;
    }

    Ok(png_data)
}

/// Decode PNG bytes into a pixmap.
pub fn decode_png(bytes: &[u8]) -> RasterResult<Pixmap> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| RasterError::Decode(e.to_string()))?;
    rgba_to_pixmap(&image.to_rgba8())
}

/// Copy straight-alpha RGBA pixels into a new pixmap.
pub fn rgba_to_pixmap(image: &RgbaImage) -> RasterResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
