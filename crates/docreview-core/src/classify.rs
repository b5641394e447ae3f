use std::sync::Arc;

use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::model::{Classification, DecisionRule, Table, TableReader};

/// Classifies one spreadsheet by the values in its decision column.
pub struct SpreadsheetClassifier<R> {
    reader: R,
    rule: DecisionRule,
    diagnostics: Arc<dyn Diagnostics + Send + Sync>,
}

impl<R: TableReader> SpreadsheetClassifier<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            rule: DecisionRule::default(),
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    pub fn with_rule(mut self, rule: DecisionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics + Send + Sync>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn rule(&self) -> &DecisionRule {
        &self.rule
    }

    /// Decode `bytes` and classify the resulting table.
    ///
    /// Decoding failures never propagate: they become [`Classification::ProcessingError`].
    pub fn classify_bytes(&self, source: &str, bytes: &[u8]) -> Classification {
        match self.reader.read_table(bytes) {
            Ok(table) => self.classify_table(source, &table),
            Err(err) => {
                self.diagnostics
                    .error(&format!("error reading spreadsheet at {source}: {err}"));
                Classification::ProcessingError
            }
        }
    }

    /// All rows affirmative -> full grant, all negative -> rejected, anything else -> partial.
    ///
    /// Only string cells can match a token; blanks, numbers and other text count as "mixed".
    /// A table without data rows is vacuously all-affirmative.
    pub fn classify_table(&self, source: &str, table: &Table) -> Classification {
        let Some(column) = table.column_index(&self.rule.column) else {
            self.diagnostics.error(&format!(
                "column '{}' not found in {source}",
                self.rule.column
            ));
            return Classification::ColumnMissing;
        };

        let mut all_affirmative = true;
        let mut all_negative = true;
        for value in table.column_values(column) {
            let value = value.as_str();
            if value != Some(self.rule.affirmative.as_str()) {
                all_affirmative = false;
            }
            if value != Some(self.rule.negative.as_str()) {
                all_negative = false;
            }
            if !all_affirmative && !all_negative {
                break;
            }
        }

        if all_affirmative {
            Classification::FullGrant
        } else if all_negative {
            Classification::Rejected
        } else {
            Classification::PartialGrant
        }
    }
}
