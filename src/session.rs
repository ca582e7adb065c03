//! The single open invoice form.
//!
//! `InvoiceModel` owns the form contents and is the only way to add or
//! remove line items. Renderers only ever see `&InvoiceData`.

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;

use crate::core::{DocumentError, DocumentResult};
use crate::models::{
    parse_amount, parse_rate, InvoiceData, InvoiceInfo, InvoiceNumberGenerator, InvoiceTotals,
    LineItem, PartyInfo,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_RATE: &str = "0";

#[derive(Debug, Clone)]
pub struct InvoiceModel {
    data: InvoiceData,
    numbers: InvoiceNumberGenerator,
    default_payment_terms: String,
}

impl Default for InvoiceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceModel {
    pub fn new() -> Self {
        Self::with_payment_terms("Net 30")
    }

    pub fn with_payment_terms(terms: impl Into<String>) -> Self {
        Self::starting_at(terms, Local::now().naive_local())
    }

    /// A fresh form as if opened at `now`.
    pub fn starting_at(terms: impl Into<String>, now: NaiveDateTime) -> Self {
        let mut model = InvoiceModel {
            data: InvoiceData::default(),
            numbers: InvoiceNumberGenerator::new(),
            default_payment_terms: terms.into(),
        };
        model.clear_at(now);
        model
    }

    pub fn data(&self) -> &InvoiceData {
        &self.data
    }

    pub fn items(&self) -> &[LineItem] {
        self.data.items()
    }

    pub fn set_company(&mut self, company: PartyInfo) {
        self.data.company = company;
    }

    pub fn set_customer(&mut self, customer: PartyInfo) {
        self.data.customer = customer;
    }

    pub fn set_details(&mut self, details: InvoiceInfo) {
        self.data.invoice = details;
    }

    pub fn set_logo(&mut self, logo: Option<PathBuf>) {
        self.data.logo = logo;
    }

    pub fn set_tax_rate(&mut self, rate: impl Into<String>) {
        self.data.tax_rate = rate.into();
    }

    pub fn set_discount_rate(&mut self, rate: impl Into<String>) {
        self.data.discount_rate = rate.into();
    }

    /// Validates the raw field values and appends a line item.
    /// Returns the new item's index; on error the list is untouched.
    pub fn add_item(&mut self, description: &str, quantity: &str, rate: &str) -> DocumentResult<usize> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DocumentError::validation("Description is required"));
        }
        let quantity = parse_amount("Quantity", quantity)?;
        let rate = parse_amount("Rate", rate)?;

        let items = self.data.items_mut();
        items.push(LineItem::new(description.to_string(), quantity, rate));
        Ok(items.len() - 1)
    }

    pub fn remove_item(&mut self, index: usize) -> DocumentResult<LineItem> {
        let items = self.data.items_mut();
        if index >= items.len() {
            return Err(DocumentError::IndexError {
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    /// Totals for the current items with the given raw rate inputs.
    pub fn compute_totals(&self, tax_rate_percent: &str, discount_rate_percent: &str) -> InvoiceTotals {
        InvoiceTotals::compute(
            self.data.items(),
            parse_rate(tax_rate_percent),
            parse_rate(discount_rate_percent),
        )
    }

    /// Totals using the rates currently typed into the form.
    pub fn totals(&self) -> InvoiceTotals {
        self.data.calculate_totals()
    }

    pub fn clear(&mut self) {
        self.clear_at(Local::now().naive_local());
    }

    pub fn clear_at(&mut self, now: NaiveDateTime) {
        let invoice = InvoiceInfo {
            number: self.numbers.issue(now),
            date: now.format(DATE_FORMAT).to_string(),
            due_date: String::new(),
            payment_terms: self.default_payment_terms.clone(),
        };
        self.data = InvoiceData::blank(invoice, DEFAULT_RATE);
    }
}
