use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contact block shared by the issuing company and the customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyInfo {
    #[serde(default)]
    pub name: String,
    /// May span several lines.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl PartyInfo {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        PartyInfo {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    pub fn address_lines(&self) -> Vec<&str> {
        self.address
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Address on a single line, line breaks replaced by ", ".
    pub fn address_inline(&self) -> String {
        self.address_lines().join(", ")
    }
}

/// Encoding of an image export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Raster format for an image export, chosen by extension.
    /// `.jpg`/`.jpeg` produce JPEG, anything else PNG.
    pub fn image_for_path(path: &Path) -> OutputFormat {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }
}
