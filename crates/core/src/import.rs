//! Outcome tracking for bulk imports.
//!
//! Each row is its own unit of work, so a batch can end fully applied,
//! partially applied, or not applied at all.

use serde::Serialize;

use crate::validation::FieldErrors;

/// Aggregate result of an import batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No row failed (includes an empty batch).
    Complete,
    /// At least one row imported and at least one failed.
    Partial,
    /// Nothing imported and at least one row failed.
    Failed,
}

/// A rejected row and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Zero-based position in the uploaded array or CSV body.
    pub index: usize,
    pub errors: FieldErrors,
}

/// Response body of the import endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub imported: usize,
    pub errors: Vec<RowFailure>,
}

/// Running tally of an import batch.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    imported: usize,
    failures: Vec<RowFailure>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, index: usize, errors: FieldErrors) {
        self.failures.push(RowFailure { index, errors });
    }

    pub fn imported(&self) -> usize {
        self.imported
    }

    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }

    pub fn outcome(&self) -> ImportOutcome {
        match (self.imported, self.failures.len()) {
            (_, 0) => ImportOutcome::Complete,
            (0, _) => ImportOutcome::Failed,
            _ => ImportOutcome::Partial,
        }
    }

    pub fn message(&self) -> String {
        if self.failures.is_empty() {
            format!("{} records imported successfully.", self.imported)
        } else {
            format!(
                "{} records imported, {} errors.",
                self.imported,
                self.failures.len()
            )
        }
    }

    pub fn into_summary(self) -> ImportSummary {
        ImportSummary {
            message: self.message(),
            imported: self.imported,
            errors: self.failures,
        }
    }
}
