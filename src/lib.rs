pub mod assets;
pub mod commands;
pub mod core;
pub mod draft;
pub mod generators;
pub mod models;
pub mod pdf;
pub mod raster;
pub mod session;

// Re-export commonly used types
pub use crate::core::{AppConfig, DocumentError, DocumentResult, ImageConfig, Money, PdfConfig};
pub use commands::{execute, Command, Outcome, Renderers};
pub use draft::{DraftItem, FieldInput, InvoiceDraft};
pub use generators::{render_image, render_pdf, render_text, save_text};
pub use models::{InvoiceData, InvoiceInfo, InvoiceTotals, LineItem, OutputFormat, PartyInfo};
pub use raster::FontSet;
pub use session::InvoiceModel;
