use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::{DocumentError, DocumentResult};

/// Page sizes in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq)]
pub enum PageSize {
    Letter,
    A4,
    Legal,
    Custom(f32, f32), // width, height in points
}

impl PageSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!("unknown page size '{}' (expected letter, a4 or legal)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 72.0,
            bottom: 18.0,
            left: 72.0,
            right: 72.0,
        }
    }
}

impl Margin {
    pub fn uniform(size: f32) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin: Margin,
    pub font_size: f32,
    pub title_size: f32,
    pub logo_height: f32,
    pub section_spacing: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        PdfConfig {
            page_size: PageSize::Letter,
            orientation: Orientation::Portrait,
            margin: Margin::default(),
            font_size: 10.0,
            title_size: 18.0,
            logo_height: 54.0, // 0.75 in
            section_spacing: 12.0,
        }
    }
}

impl PdfConfig {
    pub fn builder() -> PdfConfigBuilder {
        PdfConfigBuilder::default()
    }

    /// Page width and height after applying the orientation.
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn frame_width(&self) -> f32 {
        let (w, _) = self.page_dimensions();
        w - self.margin.left - self.margin.right
    }
}

#[derive(Default)]
pub struct PdfConfigBuilder {
    page_size: Option<PageSize>,
    orientation: Option<Orientation>,
    margin: Option<Margin>,
    font_size: Option<f32>,
    logo_height: Option<f32>,
}

impl PdfConfigBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn logo_height(mut self, height: f32) -> Self {
        self.logo_height = Some(height);
        self
    }

    pub fn build(self) -> PdfConfig {
        let default = PdfConfig::default();
        PdfConfig {
            page_size: self.page_size.unwrap_or(default.page_size),
            orientation: self.orientation.unwrap_or(default.orientation),
            margin: self.margin.unwrap_or(default.margin),
            font_size: self.font_size.unwrap_or(default.font_size),
            title_size: default.title_size,
            logo_height: self.logo_height.unwrap_or(default.logo_height),
            section_spacing: default.section_spacing,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            width: 800,
            height: 1100,
            jpeg_quality: 95,
        }
    }
}

const DEFAULT_FONT_PATHS: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub font_paths: Vec<PathBuf>,
    pub jpeg_quality: u8,
    pub payment_terms: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            font_paths: DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect(),
            jpeg_quality: 95,
            payment_terms: "Net 30".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `INVOICE_*` and `LOG_LEVEL` from the process environment.
    pub fn from_env() -> DocumentResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> DocumentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = AppConfig::default();

        let font_paths = match lookup("INVOICE_FONT_PATHS") {
            Some(paths) if !paths.trim().is_empty() => env::split_paths(&paths).collect(),
            _ => default.font_paths,
        };

        let jpeg_quality = match lookup("INVOICE_JPEG_QUALITY") {
            Some(raw) => {
                let quality: u8 = raw.trim().parse().map_err(|_| {
                    DocumentError::ConfigError(format!(
                        "INVOICE_JPEG_QUALITY must be a number between 1 and 100, got '{}'",
                        raw
                    ))
                })?;
                if !(1..=100).contains(&quality) {
                    return Err(DocumentError::ConfigError(format!(
                        "INVOICE_JPEG_QUALITY must be between 1 and 100, got {}",
                        quality
                    )));
                }
                quality
            }
            None => default.jpeg_quality,
        };

        Ok(AppConfig {
            font_paths,
            jpeg_quality,
            payment_terms: lookup("INVOICE_PAYMENT_TERMS").unwrap_or(default.payment_terms),
            log_level: lookup("LOG_LEVEL").unwrap_or(default.log_level),
        })
    }

    pub fn image_config(&self) -> ImageConfig {
        ImageConfig {
            jpeg_quality: self.jpeg_quality,
            ..ImageConfig::default()
        }
    }
}
