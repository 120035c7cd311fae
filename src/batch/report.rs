//! End-of-run batch summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::CanonicalShiftSet;

/// A document that contributed nothing to the batch, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    /// Document path.
    pub path: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Counts collected over one batch run.
///
/// Printed at the end of every run, including runs where documents were
/// skipped or the output could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Unique identifier of this run.
    pub run_id: Uuid,
    /// Supported documents found under the input directory.
    pub documents_found: usize,
    /// Documents extracted without a document-level error.
    pub documents_processed: usize,
    /// Documents skipped with their reasons.
    pub skipped: Vec<SkippedDocument>,
    /// Shift records extracted before deduplication.
    pub rows_extracted: usize,
    /// Records dropped as duplicates.
    pub duplicates_removed: usize,
    /// Canonical rows written; zero until the output is written.
    pub rows_written: usize,
    /// Store names no rule resolved.
    pub unresolved_stores: Vec<String>,
    /// Canonical rows per resolved store label.
    pub by_store: BTreeMap<String, usize>,
    /// Canonical rows per plan period (`YYYY-MM`).
    pub by_period: BTreeMap<String, usize>,
    /// Canonical rows per employment type code.
    pub by_employment_type: BTreeMap<String, usize>,
}

impl BatchReport {
    /// Creates an empty report with a fresh run id.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            documents_found: 0,
            documents_processed: 0,
            skipped: Vec::new(),
            rows_extracted: 0,
            duplicates_removed: 0,
            rows_written: 0,
            unresolved_stores: Vec::new(),
            by_store: BTreeMap::new(),
            by_period: BTreeMap::new(),
            by_employment_type: BTreeMap::new(),
        }
    }

    /// Records a skipped document.
    pub fn skip(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedDocument {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Fills in the dedup counts and breakdowns of the canonical set.
    pub fn summarize(&mut self, set: &CanonicalShiftSet) {
        self.duplicates_removed = set.duplicates_removed();
        self.unresolved_stores = set.unresolved_stores().iter().cloned().collect();
        self.by_store.clear();
        self.by_period.clear();
        self.by_employment_type.clear();

        for record in set.records() {
            *self.by_store.entry(record.store_name.clone()).or_default() += 1;
            *self
                .by_period
                .entry(format!("{:04}-{:02}", record.plan_year, record.plan_month))
                .or_default() += 1;
            *self
                .by_employment_type
                .entry(record.employment_type.code().to_string())
                .or_default() += 1;
        }
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Batch run {}", self.run_id)?;
        writeln!(f, "  documents found:     {}", self.documents_found)?;
        writeln!(f, "  documents processed: {}", self.documents_processed)?;
        writeln!(f, "  documents skipped:   {}", self.skipped.len())?;
        for skipped in &self.skipped {
            writeln!(f, "    - {}: {}", skipped.path, skipped.reason)?;
        }
        writeln!(f, "  rows extracted:      {}", self.rows_extracted)?;
        writeln!(f, "  duplicates removed:  {}", self.duplicates_removed)?;
        writeln!(f, "  canonical rows:      {}", self.rows_written)?;
        if !self.unresolved_stores.is_empty() {
            writeln!(f, "  unresolved stores:   {}", self.unresolved_stores.join(", "))?;
        }
        write_breakdown(f, "by store", &self.by_store)?;
        write_breakdown(f, "by period", &self.by_period)?;
        write_breakdown(f, "by employment type", &self.by_employment_type)
    }
}

fn write_breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    counts: &BTreeMap<String, usize>,
) -> fmt::Result {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(f, "  {}:", title)?;
    for (key, count) in counts {
        writeln!(f, "    {}: {}", key, count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_skipped_documents() {
        let mut report = BatchReport::new();
        report.documents_found = 2;
        report.documents_processed = 1;
        report.skip("in/bad.pdf", "No extractable tables in 'in/bad.pdf'");
        report.by_store.insert("Atelier".to_string(), 3);

        let text = report.to_string();
        assert!(text.starts_with(&format!("Batch run {}", report.run_id)));
        assert!(text.contains("documents skipped:   1"));
        assert!(text.contains("    - in/bad.pdf: No extractable tables"));
        assert!(text.contains("  by store:\n    Atelier: 3\n"));
        assert!(!text.contains("by period"));
    }

    #[test]
    fn test_run_ids_differ() {
        assert_ne!(BatchReport::new().run_id, BatchReport::new().run_id);
    }
}
