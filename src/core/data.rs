use chrono::{DateTime, Local};
use std::fmt;

/// The only currency the invoices are issued in.
pub const CURRENCY_SYMBOL: &str = "₨";

#[derive(Debug, Clone)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_widths: Option<Vec<f32>>,
    pub alignment: Option<Vec<ColumnAlign>>,
    pub shaded_columns: Vec<usize>,
    pub emphasize_last_row: bool,
    pub bold_first_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        TableData {
            headers,
            rows: Vec::new(),
            column_widths: None,
            alignment: None,
            shaded_columns: Vec::new(),
            emphasize_last_row: false,
            bold_first_line: false,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn with_column_widths(mut self, widths: Vec<f32>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    pub fn with_alignment(mut self, alignment: Vec<ColumnAlign>) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_shaded_columns(mut self, columns: Vec<usize>) -> Self {
        self.shaded_columns = columns;
        self
    }

    /// Bold, larger and shaded last row (grand totals).
    pub fn with_emphasized_last_row(mut self) -> Self {
        self.emphasize_last_row = true;
        self
    }

    /// Bold first line inside each body cell (party names).
    pub fn with_bold_first_line(mut self) -> Self {
        self.bold_first_line = true;
        self
    }

    pub fn column_count(&self) -> usize {
        self.headers
            .len()
            .max(self.rows.iter().map(Vec::len).max().unwrap_or(0))
    }

    pub fn align_for(&self, column: usize) -> ColumnAlign {
        self.alignment
            .as_ref()
            .and_then(|a| a.get(column).copied())
            .unwrap_or(ColumnAlign::Left)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub created_at: DateTime<Local>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            title: "Invoice".to_string(),
            author: None,
            subject: None,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money {
    pub amount: f64,
}

impl Money {
    pub fn new(amount: f64) -> Self {
        // avoid printing "-0.00"
        let amount = if amount == 0.0 { 0.0 } else { amount };
        Money { amount }
    }

    pub fn format(&self) -> String {
        format!("{}{:.2}", CURRENCY_SYMBOL, self.amount)
    }

    /// Symbol followed by the amount left-aligned in `width` columns.
    pub fn pad_left(&self, width: usize) -> String {
        format!("{}{:<width$.2}", CURRENCY_SYMBOL, self.amount, width = width)
    }

    /// Symbol followed by the amount right-aligned in `width` columns.
    pub fn pad_right(&self, width: usize) -> String {
        format!("{}{:>width$.2}", CURRENCY_SYMBOL, self.amount, width = width)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Truncates to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
