//! JSON snapshot of the invoice form, used by the command-line front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::{execute, Command, Renderers};
use crate::core::{DocumentError, DocumentResult};
use crate::models::{InvoiceInfo, PartyInfo};
use crate::session::InvoiceModel;

/// A form field that may be written as a JSON number or as the raw text a
/// user would type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
}

impl Default for FieldInput {
    fn default() -> Self {
        FieldInput::Text("0".to_string())
    }
}

impl fmt::Display for FieldInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldInput::Number(value) => write!(f, "{}", value),
            FieldInput::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    pub description: String,
    pub quantity: FieldInput,
    pub rate: FieldInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub company: PartyInfo,
    #[serde(default)]
    pub customer: PartyInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub invoice: InvoiceInfo,
    #[serde(default)]
    pub items: Vec<DraftItem>,
    #[serde(default)]
    pub tax_rate: FieldInput,
    #[serde(default)]
    pub discount_rate: FieldInput,
}

impl InvoiceDraft {
    /// Snapshot of the form as it currently stands.
    pub fn from_model(model: &InvoiceModel) -> Self {
        let data = model.data();
        InvoiceDraft {
            company: data.company.clone(),
            customer: data.customer.clone(),
            logo: data.logo.clone(),
            invoice: data.invoice.clone(),
            items: data
                .items()
                .iter()
                .map(|item| DraftItem {
                    description: item.description().to_string(),
                    quantity: FieldInput::Number(item.quantity()),
                    rate: FieldInput::Number(item.rate()),
                })
                .collect(),
            tax_rate: FieldInput::Text(data.tax_rate.clone()),
            discount_rate: FieldInput::Text(data.discount_rate.clone()),
        }
    }

    /// Commands that fill a freshly cleared form with this draft. Invoice
    /// details are left at their defaults when the draft has none.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = vec![
            Command::SetCompany(self.company.clone()),
            Command::SetCustomer(self.customer.clone()),
        ];
        if self.invoice != InvoiceInfo::default() {
            commands.push(Command::SetDetails(self.invoice.clone()));
        }
        if let Some(logo) = &self.logo {
            commands.push(Command::SetLogo(Some(logo.clone())));
        }
        commands.extend(self.items.iter().map(|item| Command::AddItem {
            description: item.description.clone(),
            quantity: item.quantity.to_string(),
            rate: item.rate.to_string(),
        }));
        commands.push(Command::SetTaxRate(self.tax_rate.to_string()));
        commands.push(Command::SetDiscountRate(self.discount_rate.to_string()));
        commands
    }

    /// Replays the draft onto `model`. A logo that cannot be loaded is
    /// dropped with a warning; any other failure stops the replay.
    pub fn apply(&self, model: &mut InvoiceModel, renderers: &Renderers) -> DocumentResult<()> {
        for command in self.commands() {
            match execute(model, command, renderers) {
                Ok(_) => {}
                Err(DocumentError::AssetError(msg)) => tracing::warn!("{}", msg),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> DocumentResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            DocumentError::IoError(format!("Cannot read draft {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DocumentError::validation(format!("Invalid draft {}: {}", path.display(), e))
        })
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DocumentError::render(format!("Cannot serialize draft: {}", e)))
    }

    pub fn save(&self, path: &Path) -> DocumentResult<()> {
        fs::write(path, self.to_json()?).map_err(|e| {
            DocumentError::IoError(format!("Cannot write draft {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::FontSet;

    const SAMPLE: &str = r#"{
        "company": { "name": "Acme Traders", "address": "12 Mall Road\nLahore" },
        "customer": { "name": "Zed Stores" },
        "items": [
            { "description": "Widget", "quantity": 2, "rate": "50" },
            { "description": "Service", "quantity": "1", "rate": 100.0 }
        ],
        "tax_rate": 10,
        "discount_rate": "abc"
    }"#;

    fn renderers() -> Renderers {
        Renderers::default().with_fonts(FontSet::builtin())
    }

    #[test]
    fn numbers_and_strings_are_both_accepted() {
        let draft: InvoiceDraft = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(draft.items[0].quantity, FieldInput::Number(2.0));
        assert_eq!(draft.items[0].rate, FieldInput::Text("50".into()));
        assert_eq!(draft.tax_rate.to_string(), "10");

        let mut model = InvoiceModel::new();
        let number = model.data().invoice.number.clone();
        draft.apply(&mut model, &renderers()).unwrap();

        assert_eq!(model.items().len(), 2);
        assert_eq!(model.data().company.name, "Acme Traders");
        assert_eq!(model.data().invoice.number, number);
        assert!((model.totals().total - 220.0).abs() < 1e-9);
    }

    #[test]
    fn missing_rates_default_to_zero() {
        let draft: InvoiceDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft.tax_rate.to_string(), "0");
        assert!(draft.items.is_empty());
    }

    #[test]
    fn bad_item_stops_the_replay() {
        let draft: InvoiceDraft = serde_json::from_str(
            r#"{ "items": [ { "description": "", "quantity": 1, "rate": 1 } ] }"#,
        )
        .unwrap();
        let mut model = InvoiceModel::new();
        let err = draft.apply(&mut model, &renderers()).unwrap_err();
        assert!(matches!(err, DocumentError::ValidationError(_)));
    }

    #[test]
    fn unreadable_logo_is_dropped() {
        let draft = InvoiceDraft {
            logo: Some(PathBuf::from("/no/such/logo.png")),
            ..InvoiceDraft::default()
        };
        let mut model = InvoiceModel::new();
        draft.apply(&mut model, &renderers()).unwrap();
        assert!(model.data().logo.is_none());
    }

    #[test]
    fn saved_draft_reproduces_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");

        let mut original = InvoiceModel::new();
        let draft: InvoiceDraft = serde_json::from_str(SAMPLE).unwrap();
        draft.apply(&mut original, &renderers()).unwrap();
        InvoiceDraft::from_model(&original).save(&path).unwrap();

        let mut copy = InvoiceModel::new();
        InvoiceDraft::load(&path).unwrap().apply(&mut copy, &renderers()).unwrap();
        assert_eq!(copy.data(), original.data());
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(InvoiceDraft::load(&path), Err(DocumentError::ValidationError(_))));
        assert!(matches!(
            InvoiceDraft::load(&dir.path().join("absent.json")),
            Err(DocumentError::IoError(_))
        ));
    }
}
