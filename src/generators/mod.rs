pub mod image;
pub mod pdf;
pub mod text;

pub use self::image::{draw_invoice, render_image};
pub use self::pdf::{build_invoice_layout, render_pdf};
pub use self::text::{render_text, save_text};
