use std::path::Path;

use crate::assets::load_logo;
use crate::core::{ColumnAlign, DocumentMetadata, DocumentResult, Money, PdfConfig, TableData};
use crate::models::{InvoiceData, InvoiceTotals, PartyInfo};
use crate::pdf::{PdfBuilder, PdfGenerator, PdfLayout};

const INCH: f32 = 72.0;
const TITLE: &str = "INVOICE";

/// Renders the invoice as a PDF at `output_path`.
pub fn render_pdf(
    data: &InvoiceData,
    totals: &InvoiceTotals,
    output_path: &Path,
    config: &PdfConfig,
) -> DocumentResult<()> {
    let layout = build_invoice_layout(data, totals, config);

    let metadata = DocumentMetadata {
        title: format!("Invoice {}", data.invoice.number),
        author: non_empty(&data.company.name),
        subject: non_empty(&data.customer.name).map(|name| format!("Invoice for {}", name)),
        ..DocumentMetadata::default()
    };

    PdfGenerator::new(metadata).render(&layout, output_path)
}

/// Lays out every section without touching the filesystem, except for
/// reading the logo.
pub fn build_invoice_layout(data: &InvoiceData, totals: &InvoiceTotals, config: &PdfConfig) -> PdfLayout {
    let spacing = config.section_spacing;
    let mut builder = PdfBuilder::new(config.clone());

    if let Some(logo_path) = &data.logo {
        match load_logo(logo_path) {
            Ok(logo) => {
                builder.add_image(&logo, config.logo_height).add_spacer(spacing);
            }
            Err(e) => {
                tracing::warn!("Skipping logo {}: {}", logo_path.display(), e);
            }
        }
    }

    builder
        .add_title(TITLE, config.title_size)
        .add_spacer(spacing)
        .add_table(&parties_table(&data.company, &data.customer))
        .add_spacer(spacing)
        .add_table(&details_table(data))
        .add_spacer(spacing)
        .add_table(&items_table(data))
        .add_spacer(spacing)
        .add_table(&totals_table(totals))
        .add_spacer(spacing * 2.0);

    builder.build()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn party_cell(party: &PartyInfo) -> String {
    let mut lines = vec![party.name.clone()];
    lines.extend(party.address_lines().into_iter().map(str::to_string));
    lines.push(format!("Phone: {}", party.phone));
    lines.push(format!("Email: {}", party.email));
    lines.join("\n")
}

fn parties_table(company: &PartyInfo, customer: &PartyInfo) -> TableData {
    let mut table = TableData::new(vec!["From:".into(), "To:".into()])
        .with_column_widths(vec![3.0 * INCH, 3.0 * INCH])
        .with_bold_first_line();
    table.add_row(vec![party_cell(company), party_cell(customer)]);
    table
}

fn details_table(data: &InvoiceData) -> TableData {
    let info = &data.invoice;
    let mut table = TableData::new(Vec::new())
        .with_column_widths(vec![1.5 * INCH; 4])
        .with_shaded_columns(vec![0, 2]);
    table.add_row(vec![
        "Invoice Number:".into(),
        info.number.clone(),
        "Invoice Date:".into(),
        info.date.clone(),
    ]);
    table.add_row(vec![
        "Due Date:".into(),
        info.due_date.clone(),
        "Payment Terms:".into(),
        info.payment_terms.clone(),
    ]);
    table
}

fn items_table(data: &InvoiceData) -> TableData {
    let mut table = TableData::new(vec![
        "Description".into(),
        "Quantity".into(),
        "Rate".into(),
        "Amount".into(),
    ])
    .with_column_widths(vec![3.0 * INCH, INCH, INCH, INCH])
    .with_alignment(vec![
        ColumnAlign::Left,
        ColumnAlign::Right,
        ColumnAlign::Right,
        ColumnAlign::Right,
    ]);

    for item in data.items() {
        table.add_row(vec![
            item.description().to_string(),
            format!("{:.1}", item.quantity()),
            Money::new(item.rate()).format(),
            Money::new(item.amount()).format(),
        ]);
    }
    table
}

fn totals_table(totals: &InvoiceTotals) -> TableData {
    let mut table = TableData::new(Vec::new())
        .with_column_widths(vec![4.0 * INCH, 2.0 * INCH])
        .with_alignment(vec![ColumnAlign::Right, ColumnAlign::Right])
        .with_emphasized_last_row();

    for (label, amount) in [
        ("Subtotal:", totals.subtotal),
        ("Discount:", totals.discount_amount),
        ("Tax:", totals.tax_amount),
        ("TOTAL:", totals.total),
    ] {
        table.add_row(vec![label.into(), Money::new(amount).format()]);
    }
    table
}
