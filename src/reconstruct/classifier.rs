//! Line classification.
//!
//! Each line of extracted text is assigned a structural role by an ordered
//! chain of rules; the first rule that matches wins:
//!
//! 1. blank lines are skipped
//! 2. short title-like lines become single-cell headings
//! 3. lines with tabs are split on tabs
//! 4. lines with runs of two or more whitespace characters are split on those runs
//! 5. `CODE LABEL UNIT QUANTITY PRICE TOTAL` lines are split into six fields
//! 6. anything else becomes a single cell
//!
//! Every rule is a pure function of the line, so classifiers can be shared
//! freely between threads.

use regex::Regex;

use crate::model::{Row, RowKind};

use super::options::ReconstructOptions;

/// Structural role of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace-only line
    Blank,
    /// Section title
    Heading(String),
    /// Tab-separated fields, empty fields kept
    TabRow(Vec<String>),
    /// Fields separated by wide whitespace, empty fields dropped
    SpaceRow(Vec<String>),
    /// The six fields of a code/label/unit/quantity/price/total line
    PatternRow(Vec<String>),
    /// Unrecognized line
    Fallback(String),
}

impl LineClass {
    /// Row kind produced by this class, `None` for blank lines.
    pub fn row_kind(&self) -> Option<RowKind> {
        match self {
            LineClass::Blank => None,
            LineClass::Heading(_) => Some(RowKind::Heading),
            LineClass::TabRow(_) => Some(RowKind::TabDelimited),
            LineClass::SpaceRow(_) => Some(RowKind::SpaceDelimited),
            LineClass::PatternRow(_) => Some(RowKind::Pattern),
            LineClass::Fallback(_) => Some(RowKind::Fallback),
        }
    }

    /// Convert into a row, `None` for blank lines.
    pub fn into_row(self) -> Option<Row> {
        let kind = self.row_kind()?;
        let cells = match self {
            LineClass::Blank => return None,
            LineClass::Heading(text) | LineClass::Fallback(text) => vec![text],
            LineClass::TabRow(cells) | LineClass::SpaceRow(cells) | LineClass::PatternRow(cells) => {
                cells
            }
        };
        Some(Row::from_strings(cells, kind))
    }
}

/// Classifies single lines of extracted text.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    max_heading_len: usize,
    decimal_number: Regex,
    space_run: Regex,
    item_pattern: Regex,
}

impl LineClassifier {
    /// Create a classifier with default options.
    pub fn new() -> Self {
        Self::with_options(&ReconstructOptions::default())
    }

    /// Create a classifier with custom options.
    pub fn with_options(options: &ReconstructOptions) -> Self {
        let amount = match symbol_class(&options.currency_symbols) {
            Some(class) => format!(r"[0-9]+[.,]?[0-9]*\s*{}?", class),
            None => r"[0-9]+[.,]?[0-9]*\s*".to_string(),
        };
        let item_pattern = format!(
            r"^(\S+)\s+(.+?)\s+(\S+)\s+([0-9]+[.,]?[0-9]*)\s+({amount})\s+({amount})$",
            amount = amount
        );

        Self {
            max_heading_len: options.max_heading_len,
            decimal_number: Regex::new(r"[0-9]+[.,][0-9]+").unwrap(),
            space_run: Regex::new(r"\s{2,}").unwrap(),
            item_pattern: Regex::new(&item_pattern).unwrap(),
        }
    }

    /// Classify one line.
    pub fn classify(&self, line: &str) -> LineClass {
        if is_blank(line) {
            return LineClass::Blank;
        }
        if let Some(title) = self.heading(line) {
            return LineClass::Heading(title);
        }
        if let Some(cells) = split_tabs(line) {
            return LineClass::TabRow(cells);
        }
        if let Some(cells) = self.split_spaces(line) {
            return LineClass::SpaceRow(cells);
        }
        if let Some(cells) = self.match_item(line) {
            return LineClass::PatternRow(cells);
        }
        LineClass::Fallback(line.trim().to_string())
    }

    /// Heading rule: the trimmed title when the line qualifies.
    pub fn heading(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if line.contains('\t')
            || trimmed.is_empty()
            || line.starts_with(char::is_whitespace)
            || self.decimal_number.is_match(line)
            || trimmed.chars().count() >= self.max_heading_len
        {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Space rule: fields separated by wide whitespace, if there are at least two.
    pub fn split_spaces(&self, line: &str) -> Option<Vec<String>> {
        if !self.space_run.is_match(line) {
            return None;
        }
        let cells: Vec<String> = self
            .space_run
            .split(line)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();
        (cells.len() > 1).then_some(cells)
    }

    /// Item rule: the six captured fields, verbatim.
    pub fn match_item(&self, line: &str) -> Option<Vec<String>> {
        let caps = self.item_pattern.captures(line)?;
        (1..=6)
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect()
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Blank rule: empty or whitespace-only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Tab rule: trimmed tab-separated fields, empty ones kept.
pub fn split_tabs(line: &str) -> Option<Vec<String>> {
    if !line.contains('\t') {
        return None;
    }
    Some(line.split('\t').map(|c| c.trim().to_string()).collect())
}

/// Regex character class for a set of currency symbols.
pub(crate) fn symbol_class(symbols: &[char]) -> Option<String> {
    if symbols.is_empty() {
        return None;
    }
    let escaped: String = symbols
        .iter()
        .map(|s| regex::escape(&s.to_string()))
        .collect();
    Some(format!("[{}]", escaped))
}
