use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::path::{Path, PathBuf};

use crate::assets::load_font_file;
use crate::raster::bitmap_font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Point size drawn with one pixel per glyph dot.
const BITMAP_NOMINAL_SIZE: f32 = 7.0;

enum Face {
    Scalable(Font<'static>),
    Bitmap,
}

/// The typeface used for raster output. Either a TrueType font found on
/// the host or the compiled-in bitmap font.
pub struct FontSet {
    face: Face,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("scalable", &self.is_scalable())
            .field("source", &self.source)
            .finish()
    }
}

impl FontSet {
    /// The first candidate that loads wins; otherwise the built-in font.
    pub fn load_or_default(search_paths: &[PathBuf]) -> FontSet {
        for path in search_paths {
            match load_font_file(path) {
                Ok(font) => {
                    tracing::info!("Using font {}", path.display());
                    return FontSet::scalable(font, Some(path.clone()));
                }
                Err(e) => tracing::debug!("{}", e),
            }
        }
        tracing::warn!("No TrueType font found, using built-in bitmap font");
        FontSet::builtin()
    }

    pub fn builtin() -> FontSet {
        FontSet {
            face: Face::Bitmap,
            source: None,
        }
    }

    pub fn scalable(font: Font<'static>, source: Option<PathBuf>) -> FontSet {
        FontSet {
            face: Face::Scalable(font),
            source,
        }
    }

    pub fn is_scalable(&self) -> bool {
        matches!(self.face, Face::Scalable(_))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Advance width of `text` in pixels at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> u32 {
        match &self.face {
            Face::Scalable(font) => text_size(Scale::uniform(size), font, text).0.max(0) as u32,
            Face::Bitmap => {
                let chars = bitmap_font::printable(text).chars().count() as u32;
                chars * ADVANCE * bitmap_scale(size)
            }
        }
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, size: f32, text: &str, color: Rgba<u8>) {
        match &self.face {
            Face::Scalable(font) => {
                draw_text_mut(canvas, color, x, y, Scale::uniform(size), font, text);
            }
            Face::Bitmap => draw_bitmap_text(canvas, x, y, bitmap_scale(size), text, color),
        }
    }
}

fn bitmap_scale(size: f32) -> u32 {
    ((size / BITMAP_NOMINAL_SIZE) as u32).max(1)
}

fn draw_bitmap_text(canvas: &mut RgbaImage, x: i32, y: i32, scale: u32, text: &str, color: Rgba<u8>) {
    let mut pen_x = x;
    for c in bitmap_font::printable(text).chars() {
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if bitmap_font::pixel(c, col, row) {
                    let px = pen_x + (col * scale) as i32;
                    let py = y + (row * scale) as i32;
                    draw_filled_rect_mut(canvas, Rect::at(px, py).of_size(scale, scale), color);
                }
            }
        }
        pen_x += (ADVANCE * scale) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn falls_back_to_bitmap_when_nothing_loads() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"nope").unwrap();

        let fonts = FontSet::load_or_default(&[dir.path().join("missing.ttf"), bogus]);
        assert!(!fonts.is_scalable());
        assert!(fonts.source().is_none());
    }

    #[test]
    fn empty_search_path_is_fine() {
        assert!(!FontSet::load_or_default(&[]).is_scalable());
    }

    #[test]
    fn bitmap_width_scales_with_size() {
        let fonts = FontSet::builtin();
        assert_eq!(fonts.text_width("INVOICE", 8.0), 7 * ADVANCE);
        assert_eq!(fonts.text_width("INVOICE", 24.0), 7 * ADVANCE * 3);
        assert_eq!(fonts.text_width("INVOICE", 14.0), 7 * ADVANCE * 2);
        assert_eq!(fonts.text_width("₨1", 12.0), 3 * ADVANCE);
        assert_eq!(fonts.text_width("", 12.0), 0);
    }

    #[test]
    fn bitmap_text_leaves_ink_inside_its_box() {
        let fonts = FontSet::builtin();
        let mut canvas = RgbaImage::from_pixel(100, 40, WHITE);
        fonts.draw_text(&mut canvas, 10, 10, 12.0, "Hi", BLACK);

        let width = fonts.text_width("Hi", 12.0);
        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| x >= 10 && x < 10 + width && y >= 10 && y < 10 + GLYPH_HEIGHT));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let fonts = FontSet::builtin();
        let mut canvas = RgbaImage::from_pixel(20, 20, WHITE);
        fonts.draw_text(&mut canvas, 15, 1090, 12.0, "clipped", BLACK);
        fonts.draw_text(&mut canvas, -50, 5, 12.0, "left", BLACK);
    }
}
