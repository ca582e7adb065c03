pub mod builder;
pub mod fonts;
pub mod generator;

pub use builder::{PdfBuilder, PdfImage, PdfLayout};
pub use fonts::PdfFont;
pub use generator::PdfGenerator;
