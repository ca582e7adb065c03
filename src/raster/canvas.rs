use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{imageops, ColorType, DynamicImage, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::core::{DocumentError, DocumentResult};
use crate::models::OutputFormat;
use crate::raster::FontSet;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A fixed-size white page drawn at absolute pixel coordinates.
pub struct Canvas<'a> {
    image: RgbaImage,
    fonts: &'a FontSet,
}

impl<'a> Canvas<'a> {
    pub fn new(width: u32, height: u32, fonts: &'a FontSet) -> Self {
        Canvas {
            image: RgbaImage::from_pixel(width, height, WHITE),
            fonts,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn text(&mut self, x: i32, y: i32, size: f32, text: &str) {
        self.fonts.draw_text(&mut self.image, x, y, size, text, BLACK);
    }

    pub fn centered_text(&mut self, y: i32, size: f32, text: &str) {
        let width = self.fonts.text_width(text, size) as i32;
        let x = (self.width() as i32 - width) / 2;
        self.text(x, y, size, text);
    }

    /// Horizontal rule from `x0` to `x1` inclusive, `thickness` pixels tall.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, thickness: u32) {
        if x1 < x0 || thickness == 0 {
            return;
        }
        let top = y - (thickness as i32 - 1) / 2;
        let rect = Rect::at(x0, top).of_size((x1 - x0 + 1) as u32, thickness);
        draw_filled_rect_mut(&mut self.image, rect, BLACK);
    }

    /// Alpha-blends `overlay` with its top-left corner at (`x`, `y`).
    pub fn paste(&mut self, overlay: &DynamicImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, &overlay.to_rgba8(), x, y);
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encodes the page as opaque RGB, JPEG or PNG.
    pub fn encode(&self, format: OutputFormat, jpeg_quality: u8) -> DocumentResult<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buffer = Vec::new();

        let result = match format {
            OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality)
                .encode(rgb.as_raw(), width, height, ColorType::Rgb8),
            OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(rgb.as_raw(), width, height, ColorType::Rgb8),
        };
        result.map_err(|e| DocumentError::render(format!("Failed to encode image: {}", e)))?;

        Ok(buffer)
    }
}
