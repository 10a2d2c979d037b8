//! Reconstruction options and configuration.

use std::ops::RangeInclusive;

/// Options for turning extracted text into a typed table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructOptions {
    /// Lines at or above this many characters are never headings
    pub max_heading_len: usize,

    /// Integers inside this range are treated as years and stay text
    pub year_range: RangeInclusive<i64>,

    /// Symbols recognized as a trailing currency marker
    pub currency_symbols: Vec<char>,

    /// Run cell type inference
    pub infer_types: bool,
}

impl ReconstructOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading length limit.
    pub fn with_max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = len;
        self
    }

    /// Set the year range excluded from integer typing.
    pub fn with_year_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.year_range = range;
        self
    }

    /// Add a recognized currency symbol.
    pub fn with_currency_symbol(mut self, symbol: char) -> Self {
        if !self.currency_symbols.contains(&symbol) {
            self.currency_symbols.push(symbol);
        }
        self
    }

    /// Replace the recognized currency symbols.
    pub fn with_currency_symbols(mut self, symbols: impl IntoIterator<Item = char>) -> Self {
        self.currency_symbols = symbols.into_iter().collect();
        self
    }

    /// Keep every cell as text.
    pub fn without_type_inference(mut self) -> Self {
        self.infer_types = false;
        self
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            max_heading_len: 100,
            year_range: 1900..=2100,
            currency_symbols: vec!['€'],
            infer_types: true,
        }
    }
}

/// Options for column width estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthOptions {
    /// Floor applied to the longest value
    pub min_width: usize,

    /// Added after the floor
    pub padding: usize,

    /// Upper bound of the final width
    pub max_width: usize,
}

impl WidthOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum width.
    pub fn with_min_width(mut self, width: usize) -> Self {
        self.min_width = width;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Set the maximum width.
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
}

impl Default for WidthOptions {
    fn default() -> Self {
        Self {
            min_width: 10,
            padding: 2,
            max_width: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReconstructOptions::default();
        assert_eq!(options.max_heading_len, 100);
        assert_eq!(options.year_range, 1900..=2100);
        assert_eq!(options.currency_symbols, vec!['€']);
        assert!(options.infer_types);

        let widths = WidthOptions::default();
        assert_eq!((widths.min_width, widths.padding, widths.max_width), (10, 2, 50));
    }

    #[test]
    fn test_builder() {
        let options = ReconstructOptions::new()
            .with_max_heading_len(60)
            .with_currency_symbol('$')
            .with_currency_symbol('€')
            .without_type_inference();
        assert_eq!(options.max_heading_len, 60);
        assert_eq!(options.currency_symbols, vec!['€', '$']);
        assert!(!options.infer_types);

        let options = ReconstructOptions::new().with_currency_symbols(['£']);
        assert_eq!(options.currency_symbols, vec!['£']);
    }
}
