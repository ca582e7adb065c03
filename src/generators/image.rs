use std::fs;
use std::path::Path;

use crate::assets::load_logo;
use crate::core::{truncate_chars, DocumentError, DocumentResult, ImageConfig, Money};
use crate::models::{InvoiceData, InvoiceTotals, OutputFormat, PartyInfo};
use crate::raster::{Canvas, FontSet};

const TITLE_SIZE: f32 = 24.0;
const HEADER_SIZE: f32 = 14.0;
const NORMAL_SIZE: f32 = 12.0;

const LEFT: i32 = 50;
const RIGHT_COLUMN: i32 = 400;
const RATE_COLUMN: i32 = 500;
const AMOUNT_COLUMN: i32 = 600;
const TOTALS_COLUMN: i32 = 500;
const TOTALS_RULE_START: i32 = 450;
const LINE_HEIGHT: i32 = 20;

const LOGO_TOP: i32 = 20;
const LOGO_MAX_WIDTH: u32 = 200;
const LOGO_MAX_HEIGHT: u32 = 80;
const MAX_DESCRIPTION_CHARS: usize = 40;

/// Draws the invoice onto a fixed-size canvas. Content past the bottom edge
/// is clipped.
pub fn draw_invoice<'a>(
    data: &InvoiceData,
    totals: &InvoiceTotals,
    fonts: &'a FontSet,
    config: &ImageConfig,
) -> Canvas<'a> {
    let mut canvas = Canvas::new(config.width, config.height, fonts);
    let right_edge = config.width as i32 - LEFT;
    let mut y = 30;

    if let Some(logo_path) = &data.logo {
        match load_logo(logo_path) {
            Ok(logo) => {
                let logo = logo.resize(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT, image::imageops::FilterType::Lanczos3);
                let x = (config.width as i64 - logo.width() as i64) / 2;
                canvas.paste(&logo, x, LOGO_TOP as i64);
                y = LOGO_TOP + logo.height() as i32 + 20;
            }
            Err(e) => tracing::warn!("Skipping logo {}: {}", logo_path.display(), e),
        }
    }

    canvas.centered_text(y, TITLE_SIZE, "INVOICE");
    y += 50;

    canvas.hline(LEFT, right_edge, y, 2);
    y += 20;

    canvas.text(LEFT, y, HEADER_SIZE, "From:");
    canvas.text(RIGHT_COLUMN, y, HEADER_SIZE, "To:");
    y += 25;

    let company = party_lines(&data.company);
    let customer = party_lines(&data.customer);
    for (i, (left, right)) in company.iter().zip(customer.iter()).enumerate() {
        let line_y = y + i as i32 * LINE_HEIGHT;
        canvas.text(LEFT, line_y, NORMAL_SIZE, left);
        canvas.text(RIGHT_COLUMN, line_y, NORMAL_SIZE, right);
    }
    y += 100;

    canvas.hline(LEFT, right_edge, y, 1);
    y += 15;

    let info = &data.invoice;
    let details = [
        format!("Invoice Number: {}", info.number),
        format!("Invoice Date: {}", info.date),
        format!("Due Date: {}", info.due_date),
        format!("Payment Terms: {}", info.payment_terms),
    ];
    for (i, detail) in details.iter().enumerate() {
        let x = if i % 2 == 0 { LEFT } else { RIGHT_COLUMN };
        canvas.text(x, y + (i / 2) as i32 * LINE_HEIGHT, NORMAL_SIZE, detail);
    }
    y += 60;

    canvas.hline(LEFT, right_edge, y, 1);
    y += 15;

    for (x, header) in [
        (LEFT, "Description"),
        (RIGHT_COLUMN, "Qty"),
        (RATE_COLUMN, "Rate"),
        (AMOUNT_COLUMN, "Amount"),
    ] {
        canvas.text(x, y, HEADER_SIZE, header);
    }
    y += 25;

    canvas.hline(LEFT, right_edge, y, 1);
    y += 15;

    for item in data.items() {
        canvas.text(LEFT, y, NORMAL_SIZE, truncate_chars(item.description(), MAX_DESCRIPTION_CHARS));
        canvas.text(RIGHT_COLUMN, y, NORMAL_SIZE, &format!("{:.1}", item.quantity()));
        canvas.text(RATE_COLUMN, y, NORMAL_SIZE, &Money::new(item.rate()).format());
        canvas.text(AMOUNT_COLUMN, y, NORMAL_SIZE, &Money::new(item.amount()).format());
        y += LINE_HEIGHT;
    }

    y += 20;
    canvas.hline(LEFT, right_edge, y, 1);
    y += 15;

    for (label, amount) in [
        ("Subtotal:", totals.subtotal),
        ("Discount:", totals.discount_amount),
        ("Tax:", totals.tax_amount),
        ("TOTAL:", totals.total),
    ] {
        let line = format!("{} {}", label, Money::new(amount).pad_right(11));
        canvas.text(TOTALS_COLUMN, y, NORMAL_SIZE, &line);
        y += LINE_HEIGHT;
    }

    canvas.hline(TOTALS_RULE_START, right_edge, y, 2);
    canvas
}

/// Renders the invoice and writes it as JPEG or PNG depending on the
/// extension of `output_path`.
pub fn render_image(
    data: &InvoiceData,
    totals: &InvoiceTotals,
    output_path: &Path,
    fonts: &FontSet,
    config: &ImageConfig,
) -> DocumentResult<()> {
    let format = OutputFormat::image_for_path(output_path);
    let canvas = draw_invoice(data, totals, fonts, config);
    let bytes = canvas.encode(format, config.jpeg_quality)?;

    fs::write(output_path, &bytes).map_err(|e| {
        DocumentError::render(format!("Cannot write image to {}: {}", output_path.display(), e))
    })?;

    tracing::info!(
        "Invoice image written to {} ({:?}, {} bytes)",
        output_path.display(),
        format,
        bytes.len()
    );
    Ok(())
}

fn party_lines(party: &PartyInfo) -> [String; 4] {
    [
        party.name.clone(),
        party.address_inline(),
        format!("Phone: {}", party.phone),
        format!("Email: {}", party.email),
    ]
}
