//! Cell type inference.
//!
//! Each populated cell is trimmed and tested against, in order: currency
//! amount, plain decimal, plain integer and `DD/MM/YYYY` date. The first
//! match replaces the cell's typed value; anything else stays text.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{Cell, CellValue, Row};

use super::classifier::symbol_class;
use super::options::ReconstructOptions;

/// First (year, month) a date cell may fall in.
const FIRST_SERIAL_MONTH: (i32, u32) = (1900, 3);

/// Infers typed values for cells.
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    currency: Option<Regex>,
    simple_amount: Regex,
    grouped_comma_decimal: Regex,
    grouped_dot_decimal: Regex,
    integer: Regex,
    date: Regex,
    year_range: RangeInclusive<i64>,
}

impl TypeInferencer {
    /// Create an inferencer with default options.
    pub fn new() -> Self {
        Self::with_options(&ReconstructOptions::default())
    }

    /// Create an inferencer with custom options.
    pub fn with_options(options: &ReconstructOptions) -> Self {
        let currency = symbol_class(&options.currency_symbols).map(|class| {
            Regex::new(&format!(r"^([0-9][0-9.,]*[0-9])\s*({})$", class)).unwrap()
        });

        Self {
            currency,
            simple_amount: Regex::new(r"^[0-9]+[.,][0-9]+$").unwrap(),
            grouped_comma_decimal: Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{3})+,[0-9]+$").unwrap(),
            grouped_dot_decimal: Regex::new(r"^[0-9]{1,3}(?:,[0-9]{3})+\.[0-9]+$").unwrap(),
            integer: Regex::new(r"^[0-9]+$").unwrap(),
            date: Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap(),
            year_range: options.year_range.clone(),
        }
    }

    /// Infer the typed value of a cell's text, `None` if it stays text.
    pub fn infer(&self, text: &str) -> Option<CellValue> {
        let value = text.trim();
        if value.is_empty() {
            return None;
        }

        if let Some(caps) = self.currency.as_ref().and_then(|re| re.captures(value)) {
            let symbol = caps[2].chars().next()?;
            return self
                .parse_amount(&caps[1])
                .map(|amount| CellValue::Currency { amount, symbol });
        }

        // Negative amounts deliberately stay text
        if self.simple_amount.is_match(value) && !value.contains('-') {
            return parse_decimal(value).map(CellValue::Decimal);
        }

        if self.integer.is_match(value) {
            let n: i64 = value.parse().ok()?;
            if self.year_range.contains(&n) {
                return None;
            }
            return Some(CellValue::Integer(n));
        }

        if let Some(caps) = self.date.captures(value) {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;
            // Serial dates are only well defined from 1900-03-01 on
            if (year, month) < FIRST_SERIAL_MONTH {
                return None;
            }
            return NaiveDate::from_ymd_opt(year, month, day).map(CellValue::Date);
        }

        None
    }

    /// Return the cell with its inferred value, or unchanged.
    pub fn infer_cell(&self, cell: Cell) -> Cell {
        match self.infer(cell.raw()) {
            Some(value) => cell.with_value(value),
            None => cell,
        }
    }

    /// Type every cell of every row.
    pub fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|row| Row {
                cells: row.cells.into_iter().map(|c| self.infer_cell(c)).collect(),
                kind: row.kind,
            })
            .collect()
    }

    /// Parse the numeric body of a currency amount.
    ///
    /// Accepts a single decimal separator (`10,00`, `10.00`) or a
    /// thousands-grouped amount whose grouping separator differs from the
    /// decimal one (`1.234,56`, `1,234.56`).
    fn parse_amount(&self, body: &str) -> Option<f64> {
        if self.simple_amount.is_match(body) {
            parse_decimal(body)
        } else if self.grouped_comma_decimal.is_match(body) {
            parse_decimal(&body.replace('.', ""))
        } else if self.grouped_dot_decimal.is_match(body) {
            body.replace(',', "")
                .parse()
                .ok()
                .filter(|x: &f64| x.is_finite())
        } else {
            None
        }
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `digits sep digits`, normalizing a comma separator to a dot.
///
/// Values too large for a finite `f64` are rejected.
fn parse_decimal(value: &str) -> Option<f64> {
    value
        .replacen(',', ".", 1)
        .parse()
        .ok()
        .filter(|x: &f64| x.is_finite())
}
