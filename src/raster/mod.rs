pub mod bitmap_font;
pub mod canvas;
pub mod font;

pub use canvas::Canvas;
pub use font::FontSet;
