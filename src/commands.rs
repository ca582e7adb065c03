//! User actions on the invoice form, independent of any UI toolkit.

use chrono::Local;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::path::PathBuf;

use crate::assets::load_logo;
use crate::core::{AppConfig, DocumentError, DocumentResult, PdfConfig};
use crate::generators::{render_image, render_pdf, render_text, save_text};
use crate::models::{InvoiceInfo, LineItem, PartyInfo};
use crate::raster::FontSet;
use crate::session::InvoiceModel;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetCompany(PartyInfo),
    SetCustomer(PartyInfo),
    SetDetails(InvoiceInfo),
    SetLogo(Option<PathBuf>),
    AddItem {
        description: String,
        quantity: String,
        rate: String,
    },
    /// `None` when nothing is selected.
    RemoveItem(Option<usize>),
    SetTaxRate(String),
    SetDiscountRate(String),
    Generate,
    SaveText(PathBuf),
    ExportPdf(PathBuf),
    ExportImage(PathBuf),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated,
    ItemAdded(usize),
    ItemRemoved(LineItem),
    Preview(String),
    Saved(PathBuf),
    Cleared,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Updated => write!(f, "Updated"),
            Outcome::ItemAdded(index) => write!(f, "Item {} added", index + 1),
            Outcome::ItemRemoved(item) => write!(f, "Removed '{}'", item.description()),
            Outcome::Preview(_) => write!(f, "Invoice generated"),
            Outcome::Saved(path) => write!(f, "Invoice saved: {}", path.display()),
            Outcome::Cleared => write!(f, "Form cleared"),
        }
    }
}

/// Output settings shared by every export. The raster font is loaded the
/// first time an image is exported.
pub struct Renderers {
    config: AppConfig,
    pdf: PdfConfig,
    fonts: OnceCell<FontSet>,
}

impl Renderers {
    pub fn new(config: AppConfig) -> Self {
        Renderers {
            config,
            pdf: PdfConfig::default(),
            fonts: OnceCell::new(),
        }
    }

    pub fn with_pdf_config(mut self, pdf: PdfConfig) -> Self {
        self.pdf = pdf;
        self
    }

    /// Uses `fonts` instead of searching the configured font paths.
    pub fn with_fonts(self, fonts: FontSet) -> Self {
        Renderers {
            fonts: OnceCell::from(fonts),
            ..self
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        self.fonts
            .get_or_init(|| FontSet::load_or_default(&self.config.font_paths))
    }
}

impl Default for Renderers {
    fn default() -> Self {
        Renderers::new(AppConfig::default())
    }
}

fn require_items(model: &InvoiceModel) -> DocumentResult<()> {
    if model.items().is_empty() {
        return Err(DocumentError::validation("Please add at least one item"));
    }
    Ok(())
}

/// Applies `command` to `model`. Failed commands leave the model as it was,
/// except `SetLogo`, which clears the logo when the file is not an image.
pub fn execute(model: &mut InvoiceModel, command: Command, renderers: &Renderers) -> DocumentResult<Outcome> {
    match command {
        Command::SetCompany(company) => {
            model.set_company(company);
            Ok(Outcome::Updated)
        }
        Command::SetCustomer(customer) => {
            model.set_customer(customer);
            Ok(Outcome::Updated)
        }
        Command::SetDetails(details) => {
            model.set_details(details);
            Ok(Outcome::Updated)
        }
        Command::SetLogo(None) => {
            model.set_logo(None);
            Ok(Outcome::Updated)
        }
        Command::SetLogo(Some(path)) => match load_logo(&path) {
            Ok(_) => {
                model.set_logo(Some(path));
                Ok(Outcome::Updated)
            }
            Err(e) => {
                model.set_logo(None);
                Err(e)
            }
        },
        Command::AddItem {
            description,
            quantity,
            rate,
        } => {
            let index = model.add_item(&description, &quantity, &rate)?;
            Ok(Outcome::ItemAdded(index))
        }
        Command::RemoveItem(None) => Err(DocumentError::SelectionError(
            "Please select an item to remove".to_string(),
        )),
        Command::RemoveItem(Some(index)) => {
            let removed = model.remove_item(index)?;
            Ok(Outcome::ItemRemoved(removed))
        }
        Command::SetTaxRate(rate) => {
            model.set_tax_rate(rate);
            Ok(Outcome::Updated)
        }
        Command::SetDiscountRate(rate) => {
            model.set_discount_rate(rate);
            Ok(Outcome::Updated)
        }
        Command::Generate => {
            require_items(model)?;
            let text = render_text(model.data(), &model.totals(), Local::now().naive_local());
            Ok(Outcome::Preview(text))
        }
        Command::SaveText(path) => {
            require_items(model)?;
            let text = render_text(model.data(), &model.totals(), Local::now().naive_local());
            save_text(&path, &text)?;
            Ok(Outcome::Saved(path))
        }
        Command::ExportPdf(path) => {
            require_items(model)?;
            render_pdf(model.data(), &model.totals(), &path, &renderers.pdf)?;
            Ok(Outcome::Saved(path))
        }
        Command::ExportImage(path) => {
            require_items(model)?;
            let image_config = renderers.config.image_config();
            render_image(model.data(), &model.totals(), &path, renderers.fonts(), &image_config)?;
            Ok(Outcome::Saved(path))
        }
        Command::Clear => {
            model.clear();
            Ok(Outcome::Cleared)
        }
    }
}
