//! Cell types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The typed value held by a cell.
///
/// Every cell starts as [`CellValue::Text`] and may be promoted by type
/// inference. The display format is derived from the variant, so a value
/// and its format can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Plain text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Decimal number without a currency symbol
    Decimal(f64),
    /// Monetary amount with its trailing symbol
    Currency {
        /// Parsed amount
        amount: f64,
        /// Currency symbol (e.g. `€`)
        symbol: char,
    },
    /// Calendar date
    Date(NaiveDate),
}

impl CellValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Decimal(n) => Some(*n),
            CellValue::Currency { amount, .. } => Some(*amount),
            CellValue::Text(_) | CellValue::Date(_) => None,
        }
    }

    /// Check if the value is numeric.
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

/// Display format tag of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Plain text
    #[default]
    Text,
    /// Number without explicit formatting
    General,
    /// Two decimals with thousands separator
    Decimal,
    /// Two decimals with thousands separator and trailing symbol
    Currency(char),
    /// Day/month/year
    Date,
}

impl CellFormat {
    /// Spreadsheet number-format code, `None` for text and general cells.
    pub fn number_format(&self) -> Option<String> {
        match self {
            CellFormat::Text | CellFormat::General => None,
            CellFormat::Decimal => Some("#,##0.00".to_string()),
            CellFormat::Currency(symbol) => Some(format!("#,##0.00 \"{}\"", symbol)),
            CellFormat::Date => Some("dd/mm/yyyy".to_string()),
        }
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    raw: String,
    value: CellValue,
}

impl Cell {
    /// Create a text cell. The typed value starts as the raw text.
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            value: CellValue::Text(raw.clone()),
            raw,
        }
    }

    /// Create an empty padding cell.
    pub fn empty() -> Self {
        Self::text(String::new())
    }

    /// Replace the typed value, keeping the raw text.
    pub fn with_value(mut self, value: CellValue) -> Self {
        self.value = value;
        self
    }

    /// Original text as extracted.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Typed value.
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Display format derived from the typed value.
    pub fn format(&self) -> CellFormat {
        match &self.value {
            CellValue::Text(_) => CellFormat::Text,
            CellValue::Integer(_) => CellFormat::General,
            CellValue::Decimal(_) => CellFormat::Decimal,
            CellValue::Currency { symbol, .. } => CellFormat::Currency(*symbol),
            CellValue::Date(_) => CellFormat::Date,
        }
    }

    /// Check if the cell has no visible text.
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Check if type inference promoted this cell.
    pub fn is_typed(&self) -> bool {
        !matches!(self.value, CellValue::Text(_))
    }

    /// Length of the rendered text in characters.
    pub fn display_len(&self) -> usize {
        self.raw.chars().count()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_cell_defaults() {
        let cell = Cell::text("Widget");
        assert_eq!(cell.raw(), "Widget");
        assert_eq!(cell.value(), &CellValue::Text("Widget".to_string()));
        assert_eq!(cell.format(), CellFormat::Text);
        assert!(!cell.is_typed());
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_format_follows_value() {
        let cell = Cell::text("10,00€").with_value(CellValue::Currency {
            amount: 10.0,
            symbol: '€',
        });
        assert_eq!(cell.format(), CellFormat::Currency('€'));
        assert_eq!(cell.raw(), "10,00€");
        assert!(cell.value().is_numeric());

        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let cell = Cell::text("25/12/2024").with_value(CellValue::Date(date));
        assert_eq!(cell.format(), CellFormat::Date);
        assert!(!cell.value().is_numeric());
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(CellFormat::Text.number_format(), None);
        assert_eq!(CellFormat::General.number_format(), None);
        assert_eq!(
            CellFormat::Decimal.number_format().as_deref(),
            Some("#,##0.00")
        );
        assert_eq!(
            CellFormat::Currency('€').number_format().as_deref(),
            Some("#,##0.00 \"€\"")
        );
        assert_eq!(
            CellFormat::Date.number_format().as_deref(),
            Some("dd/mm/yyyy")
        );
    }

    #[test]
    fn test_display_len_counts_chars() {
        assert_eq!(Cell::text("30,00€").display_len(), 6);
        assert_eq!(Cell::empty().display_len(), 0);
        assert!(Cell::text("   ").is_empty());
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_string(&CellValue::Integer(150)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":150}"#);
    }
}
