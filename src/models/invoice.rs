use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::PartyInfo;
use crate::core::{DocumentError, DocumentResult};

/// One billable row. `amount` is fixed to `quantity * rate` when the item
/// is created and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    description: String,
    quantity: f64,
    rate: f64,
    amount: f64,
}

impl LineItem {
    pub(crate) fn new(description: String, quantity: f64, rate: f64) -> Self {
        LineItem {
            description,
            quantity,
            rate,
            amount: quantity * rate,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub payment_terms: String,
}

/// Everything the renderers read. Items are only added or removed through
/// the session so the amount invariant holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceData {
    pub company: PartyInfo,
    pub customer: PartyInfo,
    pub invoice: InvoiceInfo,
    pub logo: Option<PathBuf>,
    /// Raw form input, parsed leniently.
    pub tax_rate: String,
    /// Raw form input, parsed leniently.
    pub discount_rate: String,
    items: Vec<LineItem>,
}

impl InvoiceData {
    /// An empty form carrying `invoice` details and the same raw input for
    /// both rates.
    pub fn blank(invoice: InvoiceInfo, rate: &str) -> Self {
        InvoiceData {
            invoice,
            tax_rate: rate.to_string(),
            discount_rate: rate.to_string(),
            ..InvoiceData::default()
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    pub fn calculate_totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(
            &self.items,
            parse_rate(&self.tax_rate),
            parse_rate(&self.discount_rate),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub taxable_amount: f64,
    pub tax_amount: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Discount applies to the subtotal, tax to what remains after it.
    pub fn compute(items: &[LineItem], tax_percent: f64, discount_percent: f64) -> Self {
        let subtotal: f64 = items.iter().map(LineItem::amount).sum();
        let discount_amount = subtotal * (discount_percent / 100.0);
        let taxable_amount = subtotal - discount_amount;
        let tax_amount = taxable_amount * (tax_percent / 100.0);

        InvoiceTotals {
            subtotal,
            discount_amount,
            taxable_amount,
            tax_amount,
            total: taxable_amount + tax_amount,
        }
    }
}

/// Tax/discount percentages: anything empty, non-numeric or non-finite
/// counts as 0.
pub fn parse_rate(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::debug!("Rate input '{}' is not a number, using 0", trimmed);
            0.0
        }
    }
}

/// Quantity/rate of a line item: must be a finite number >= 0.
pub fn parse_amount(field: &str, input: &str) -> DocumentResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::validation(format!("{} is required", field)));
    }

    let value: f64 = trimmed.parse().map_err(|_| {
        DocumentError::validation(format!("{} must be a number, got '{}'", field, trimmed))
    })?;

    if !value.is_finite() {
        return Err(DocumentError::validation(format!(
            "{} must be a finite number, got '{}'",
            field, trimmed
        )));
    }
    if value < 0.0 {
        return Err(DocumentError::validation(format!(
            "{} must not be negative, got '{}'",
            field, trimmed
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(rows: &[(&str, f64, f64)]) -> Vec<LineItem> {
        rows.iter()
            .map(|(d, q, r)| LineItem::new(d.to_string(), *q, *r))
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tax_only_example() {
        let list = items(&[("Widget", 2.0, 50.0), ("Service", 1.0, 100.0)]);
        let totals = InvoiceTotals::compute(&list, 10.0, 0.0);
        assert!(close(totals.subtotal, 200.0));
        assert!(close(totals.discount_amount, 0.0));
        assert!(close(totals.tax_amount, 20.0));
        assert!(close(totals.total, 220.0));
    }

    #[test]
    fn discount_only_example() {
        let list = items(&[("Widget", 2.0, 50.0), ("Service", 1.0, 100.0)]);
        let totals = InvoiceTotals::compute(&list, 0.0, 10.0);
        assert!(close(totals.subtotal, 200.0));
        assert!(close(totals.discount_amount, 20.0));
        assert!(close(totals.tax_amount, 0.0));
        assert!(close(totals.total, 180.0));
    }

    #[test]
    fn tax_is_applied_after_discount() {
        let list = items(&[("A", 3.0, 12.5), ("B", 0.5, 7.0), ("C", 0.0, 99.0)]);
        let totals = InvoiceTotals::compute(&list, 17.0, 5.0);
        let subtotal = 3.0 * 12.5 + 0.5 * 7.0;
        let discount = subtotal * 0.05;
        let tax = (subtotal - discount) * 0.17;
        assert!(close(totals.subtotal, subtotal));
        assert!(close(totals.taxable_amount, subtotal - discount));
        assert!(close(totals.total, subtotal - discount + tax));
    }

    #[test]
    fn empty_list_totals_are_zero() {
        let totals = InvoiceTotals::compute(&[], 10.0, 10.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn amount_is_fixed_at_creation() {
        let item = LineItem::new("Widget".into(), 2.5, 4.0);
        assert_eq!(item.amount(), 10.0);
    }

    #[test]
    fn lenient_rate_parsing() {
        assert_eq!(parse_rate("10"), 10.0);
        assert_eq!(parse_rate(" 7.5 "), 7.5);
        assert_eq!(parse_rate(""), 0.0);
        assert_eq!(parse_rate("ten"), 0.0);
        assert_eq!(parse_rate("NaN"), 0.0);
        assert_eq!(parse_rate("inf"), 0.0);
    }

    #[test]
    fn strict_amount_parsing() {
        assert_eq!(parse_amount("Quantity", "2").unwrap(), 2.0);
        assert_eq!(parse_amount("Quantity", "0").unwrap(), 0.0);
        assert!(parse_amount("Quantity", "").is_err());
        assert!(parse_amount("Quantity", "two").is_err());
        assert!(parse_amount("Rate", "-1").is_err());
        assert!(parse_amount("Rate", "inf").is_err());
    }

    #[test]
    fn invoice_data_uses_raw_rate_inputs() {
        let mut data = InvoiceData::default();
        data.items_mut().extend(items(&[("Widget", 2.0, 50.0), ("Service", 1.0, 100.0)]));
        data.tax_rate = "10".into();
        data.discount_rate = "abc".into();
        let totals = data.calculate_totals();
        assert!(close(totals.total, 220.0));
    }

    #[test]
    fn blank_form_has_no_items_and_given_rates() {
        let info = InvoiceInfo {
            number: "INV-1".into(),
            ..InvoiceInfo::default()
        };
        let data = InvoiceData::blank(info.clone(), "0");
        assert!(data.items().is_empty());
        assert_eq!(data.invoice, info);
        assert_eq!((data.tax_rate.as_str(), data.discount_rate.as_str()), ("0", "0"));
        assert!(data.logo.is_none());
    }
}
