//! Logo and font files read from disk.

use image::DynamicImage;
use rusttype::Font;
use std::fs;
use std::path::Path;

use crate::core::{DocumentError, DocumentResult};

pub fn load_logo(path: &Path) -> DocumentResult<DynamicImage> {
    let logo = image::open(path).map_err(|e| {
        DocumentError::asset(format!("Cannot load logo {}: {}", path.display(), e))
    })?;
    if logo.width() == 0 || logo.height() == 0 {
        return Err(DocumentError::asset(format!("Logo {} is empty", path.display())));
    }
    tracing::debug!("Loaded logo {} ({}x{})", path.display(), logo.width(), logo.height());
    Ok(logo)
}

pub fn load_font_file(path: &Path) -> DocumentResult<Font<'static>> {
    let bytes = fs::read(path).map_err(|e| {
        DocumentError::asset(format!("Cannot read font {}: {}", path.display(), e))
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| {
        DocumentError::asset(format!("{} is not a TrueType font", path.display()))
    })
}
