use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

use crate::core::{DocumentError, DocumentResult, Money};
use crate::models::{InvoiceData, InvoiceTotals};

const PAGE_WIDTH: usize = 80;
const TOTALS_INDENT: usize = 52;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed-width plain-text invoice. The only input besides the invoice is
/// the footer timestamp, so equal inputs give equal output.
pub fn render_text(data: &InvoiceData, totals: &InvoiceTotals, generated_at: NaiveDateTime) -> String {
    let heavy = "=".repeat(PAGE_WIDTH);
    let light = "-".repeat(PAGE_WIDTH);
    let indent = " ".repeat(TOTALS_INDENT);
    let company = &data.company;
    let customer = &data.customer;
    let details = &data.invoice;

    let logo_info = match data.logo.as_ref().and_then(|p| p.file_name()) {
        Some(name) => format!("Logo: {}", name.to_string_lossy()),
        None => "No logo".to_string(),
    };

    let mut lines: Vec<String> = vec![
        heavy.clone(),
        format!("{:>34}", "INVOICE"),
        heavy.clone(),
        String::new(),
        format!("{:<41}{}", "From:", "To:"),
        format!("{:<35} {}", company.name, customer.name),
        format!("{:<35} {}", company.address_inline(), customer.address_inline()),
        format!("Phone: {:<27} Phone: {}", company.phone, customer.phone),
        format!("Email: {:<27} Email: {}", company.email, customer.email),
        logo_info,
        String::new(),
        light.clone(),
        String::new(),
        "Invoice Details:".to_string(),
        format!("Invoice Number: {:<20} Invoice Date: {}", details.number, details.date),
        format!("Due Date: {:<26} Payment Terms: {}", details.due_date, details.payment_terms),
        String::new(),
        light.clone(),
        String::new(),
        "ITEMS:".to_string(),
        light.clone(),
        format!("{:<40} {:<8} {:<12} {:<12}", "Description", "Qty", "Rate", "Amount"),
        light.clone(),
    ];

    for item in data.items() {
        lines.push(format!(
            "{:<40} {:<8.1} {} {}",
            item.description(),
            item.quantity(),
            Money::new(item.rate()).pad_left(11),
            Money::new(item.amount()).pad_left(11),
        ));
    }

    lines.extend([
        String::new(),
        light.clone(),
        format!("{}Subtotal: {}", indent, Money::new(totals.subtotal).pad_right(11)),
        format!("{}Discount: {}", indent, Money::new(totals.discount_amount).pad_right(11)),
        format!("{}Tax:      {}", indent, Money::new(totals.tax_amount).pad_right(11)),
        format!("{}{}", indent, "=".repeat(20)),
        format!("{}TOTAL:    {}", indent, Money::new(totals.total).pad_right(11)),
        light.clone(),
        String::new(),
        "Payment Instructions:".to_string(),
        String::new(),
        String::new(),
        light,
        format!("Generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
        heavy,
    ]);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn save_text(path: &Path, content: &str) -> DocumentResult<()> {
    fs::write(path, content).map_err(|e| {
        DocumentError::IoError(format!("Failed to save invoice to {}: {}", path.display(), e))
    })?;
    tracing::info!("Invoice text saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartyInfo;
    use crate::session::InvoiceModel;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn sample() -> InvoiceModel {
        let mut model = InvoiceModel::starting_at("Net 30", at());
        model.set_company(PartyInfo::new("Acme Traders", "12 Mall Road\nLahore", "042-111", "sales@acme.pk"));
        model.set_customer(PartyInfo::new("Zed Stores", "5 Canal View", "0300-222", "buy@zed.pk"));
        model.add_item("Widget", "2", "50").unwrap();
        model.add_item("Service", "1", "100").unwrap();
        model.set_tax_rate("10");
        model
    }

    fn line_starting<'a>(text: &'a str, prefix: &str) -> &'a str {
        text.lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("no line starting with {prefix:?}"))
    }

    #[test]
    fn layout_has_banner_blocks_and_footer() {
        let model = sample();
        let text = render_text(model.data(), &model.totals(), at());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1].trim(), "INVOICE");
        assert_eq!(lines[4], format!("From:{}To:", " ".repeat(36)));
        assert_eq!(lines[5], format!("{:<35} Zed Stores", "Acme Traders"));
        assert_eq!(lines[6], format!("{:<35} 5 Canal View", "12 Mall Road, Lahore"));
        assert_eq!(lines[9], "No logo");
        assert_eq!(
            line_starting(&text, "Invoice Number:"),
            format!("Invoice Number: {:<20} Invoice Date: 2026-10-19", "INV-202610190930")
        );
        assert_eq!(*lines.last().unwrap(), "=".repeat(80));
        assert_eq!(lines[lines.len() - 2], "Generated on: 2026-10-19 09:30:15");
    }

    #[test]
    fn item_rows_use_fixed_columns() {
        let model = sample();
        let text = render_text(model.data(), &model.totals(), at());
        let row = line_starting(&text, "Widget");
        assert_eq!(
            row,
            format!("{:<40} {:<8} ₨{:<11} ₨{:<11}", "Widget", "2.0", "50.00", "100.00")
        );
        let header = line_starting(&text, "Description");
        assert_eq!(header.chars().count(), 40 + 1 + 8 + 1 + 12 + 1 + 12);
    }

    #[test]
    fn totals_are_right_aligned() {
        let model = sample();
        let text = render_text(model.data(), &model.totals(), at());
        let total = text.lines().find(|l| l.trim_start().starts_with("TOTAL:")).unwrap();
        assert_eq!(total, format!("{}TOTAL:    ₨{:>11}", " ".repeat(52), "220.00"));
        let tax = text.lines().find(|l| l.trim_start().starts_with("Tax:")).unwrap();
        assert!(tax.ends_with("₨      20.00"));
    }

    #[test]
    fn output_is_deterministic_for_same_timestamp() {
        let model = sample();
        let a = render_text(model.data(), &model.totals(), at());
        let b = render_text(model.data(), &model.totals(), at());
        assert_eq!(a, b);
    }

    #[test]
    fn logo_line_shows_file_name() {
        let mut model = sample();
        model.set_logo(Some(PathBuf::from("/tmp/brand/logo.png")));
        let text = render_text(model.data(), &model.totals(), at());
        assert!(text.lines().any(|l| l == "Logo: logo.png"));
    }

    #[test]
    fn save_text_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("invoice.txt");
        let err = save_text(&target, "x").unwrap_err();
        assert!(matches!(err, DocumentError::IoError(_)));
    }
}
