//! Row building.

use crate::model::Row;

use super::classifier::{LineClass, LineClassifier};

/// Drives the line classifier over a whole document.
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    classifier: LineClassifier,
}

impl RowBuilder {
    /// Create a row builder with default classification rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row builder around a configured classifier.
    pub fn with_classifier(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    /// Build rows from newline-delimited text.
    pub fn build(&self, text: &str) -> Vec<Row> {
        self.build_lines(text.lines())
    }

    /// Build rows from a sequence of lines, one row per non-blank line.
    pub fn build_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut blank = 0usize;

        for (index, line) in lines.into_iter().enumerate() {
            let class = self.classifier.classify(line);
            if matches!(class, LineClass::Blank) {
                blank += 1;
                continue;
            }
            log::trace!("line {}: {:?}", index + 1, class);
            rows.extend(class.into_row());
        }

        log::debug!(
            "RowBuilder: built {} rows ({} blank lines skipped)",
            rows.len(),
            blank
        );
        rows
    }
}
