//! Product records produced by the extraction pipeline
//!
//! A record always carries every configured field. A field whose selector
//! matched nothing holds [`FieldValue::Missing`] rather than being dropped, so
//! every record of a run has the same columns.

use chrono::{DateTime, Local};
use std::fmt;

/// Format of the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Column names of a record, in output order (without the optional `id`)
pub const FIELD_COLUMNS: [&str; 5] = ["product_name", "review", "price", "discount_price", "date"];

/// Value of one extracted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Normalized text of the first matching element
    Text(String),

    /// The selector matched nothing
    Missing,
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns the text, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Missing => None,
        }
    }

    /// Cell content in the CSV output; missing values become empty cells
    pub fn as_cell(&self) -> &str {
        self.as_text().unwrap_or("")
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Missing => f.write_str("<missing>"),
        }
    }
}

/// Capture timestamp shared by every record of one extraction batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureStamp(String);

impl CaptureStamp {
    /// Stamps the current local time
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    pub fn from_datetime(at: DateTime<Local>) -> Self {
        Self(at.format(DATE_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One product extracted from a product block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// 1-based position of the block on its page, when sequential ids are on
    pub id: Option<usize>,
    pub product_name: FieldValue,
    pub review: FieldValue,
    pub price: FieldValue,
    pub discount_price: FieldValue,
    pub date: String,
}

impl ProductRecord {
    /// Column names of this record, in output order
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = Vec::with_capacity(FIELD_COLUMNS.len() + 1);
        if self.id.is_some() {
            headers.push("id");
        }
        headers.extend(FIELD_COLUMNS);
        headers
    }

    /// Cell values of this record, aligned with [`ProductRecord::headers`]
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(FIELD_COLUMNS.len() + 1);
        if let Some(id) = self.id {
            cells.push(id.to_string());
        }
        cells.push(self.product_name.as_cell().to_string());
        cells.push(self.review.as_cell().to_string());
        cells.push(self.price.as_cell().to_string());
        cells.push(self.discount_price.as_cell().to_string());
        cells.push(self.date.clone());
        cells
    }
}
