//! Batch orchestration: documents in, canonical CSV out.
//!
//! Documents are processed one at a time, each fully read and closed before
//! the next. A document-level failure skips that document and the batch
//! continues. Output is buffered and written once at the end, so the only
//! batch-fatal conditions are a missing input directory and an unwritable
//! output path.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::RosterConfig;
use crate::error::{RosterError, RosterResult};
use crate::extract::{SourceRegistry, TableExtractor};
use crate::models::ShiftRecord;
use crate::normalize::StoreResolver;
use crate::pipeline::{CanonicalShiftSet, write_canonical_csv, write_raw_csv};

use super::BatchReport;

/// Where a batch reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Directory searched recursively for roster documents.
    pub input_dir: PathBuf,
    /// Canonical CSV path.
    pub output_csv: PathBuf,
    /// Optional path for every extracted row before deduplication.
    pub raw_csv: Option<PathBuf>,
}

/// Extraction results held in memory until they are written.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Run summary.
    pub report: BatchReport,
    /// Deduplicated shifts.
    pub canonical: CanonicalShiftSet,
    /// Every extracted shift in processing order.
    pub raw: Vec<ShiftRecord>,
}

impl BatchOutcome {
    /// Writes the canonical CSV (and the raw CSV, if requested).
    ///
    /// `report.rows_written` is set once the canonical file is on disk.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::OutputUnwritable`] if either file cannot be
    /// written.
    pub fn write(&mut self, options: &BatchOptions) -> RosterResult<()> {
        write_canonical_csv(&options.output_csv, &self.canonical)?;
        self.report.rows_written = self.canonical.len();

        if let Some(raw_csv) = &options.raw_csv {
            write_raw_csv(raw_csv, &self.raw)?;
        }
        Ok(())
    }
}

/// Runs extraction over a directory of roster documents.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    extractor: TableExtractor,
    resolver: StoreResolver,
    registry: SourceRegistry,
}

impl BatchRunner {
    /// Creates a runner from the loaded configuration.
    pub fn new(config: &RosterConfig) -> RosterResult<Self> {
        Ok(Self {
            extractor: TableExtractor::new(config)?,
            resolver: StoreResolver::new(config.stores()),
            registry: SourceRegistry::new(),
        })
    }

    /// Finds supported documents under `dir`, recursively, in path order.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InputNotFound`] if `dir` is not a directory or
    /// holds no supported document.
    pub fn discover(&self, dir: &Path) -> RosterResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(RosterError::InputNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut documents: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.registry.supports(path))
            .collect();
        documents.sort();

        if documents.is_empty() {
            return Err(RosterError::InputNotFound {
                path: format!("{} (no supported documents)", dir.display()),
            });
        }
        Ok(documents)
    }

    /// Extracts every document under `input_dir` and deduplicates the result.
    pub fn collect(&self, input_dir: &Path) -> RosterResult<BatchOutcome> {
        let documents = self.discover(input_dir)?;
        info!(input = %input_dir.display(), documents = documents.len(), "Starting batch");
        Ok(self.collect_documents(&documents))
    }

    /// Extracts the given documents in order.
    ///
    /// Document-level errors are recorded in the report and never abort the
    /// batch.
    pub fn collect_documents(&self, documents: &[PathBuf]) -> BatchOutcome {
        let mut report = BatchReport::new();
        report.documents_found = documents.len();
        let mut raw = Vec::new();

        for path in documents {
            let Some(source) = self.registry.source_for(path) else {
                report.skip(path.display().to_string(), "unsupported document type");
                continue;
            };

            match self.extractor.extract_document(source.as_ref(), path) {
                Ok(extraction) => {
                    report.documents_processed += 1;
                    raw.extend(extraction.records);
                }
                Err(e) => {
                    warn!(
                        document = %path.display(),
                        error = %e,
                        document_level = e.is_document_level(),
                        "Skipping document"
                    );
                    report.skip(path.display().to_string(), e.to_string());
                }
            }
        }

        report.rows_extracted = raw.len();
        let canonical = CanonicalShiftSet::build(raw.iter().cloned(), &self.resolver);
        report.summarize(&canonical);

        info!(
            run_id = %report.run_id,
            processed = report.documents_processed,
            skipped = report.skipped.len(),
            rows = report.rows_extracted,
            duplicates = report.duplicates_removed,
            "Batch extraction finished"
        );

        BatchOutcome {
            report,
            canonical,
            raw,
        }
    }

    /// Collects `options.input_dir` and writes the outputs.
    ///
    /// Returns the outcome even when writing fails, so the caller can still
    /// print the report.
    pub fn run(&self, options: &BatchOptions) -> RosterResult<(BatchOutcome, RosterResult<()>)> {
        let mut outcome = self.collect(&options.input_dir)?;
        let written = outcome.write(options);
        Ok((outcome, written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::fs;
    use tempfile::TempDir;

    fn runner() -> BatchRunner {
        BatchRunner::new(ConfigLoader::builtin().unwrap().config()).unwrap()
    }

    #[test]
    fn test_discover_recursive_sorted_supported_only() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join("b")).unwrap();
        fs::write(dir.join("b/R_20251001-20251031_Atelier.csv"), "").unwrap();
        fs::write(dir.join("a.tsv"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let found = runner().discover(dir).unwrap();
        assert_eq!(found, vec![dir.join("a.tsv"), dir.join("b/R_20251001-20251031_Atelier.csv")]);
    }

    #[test]
    fn test_discover_missing_and_empty_directories() {
        let runner = runner();
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(
            runner.discover(&missing),
            Err(RosterError::InputNotFound { .. })
        ));

        let dir = temp.path();
        fs::write(dir.join("readme.md"), "").unwrap();
        match runner.discover(dir) {
            Err(RosterError::InputNotFound { path }) => {
                assert!(path.ends_with("(no supported documents)"))
            }
            other => panic!("expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_is_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let empty = dir.join("R_20251001-20251031_Atelier.csv");
        let good = dir.join("R_20251001-20251031_Stand+Banh+Mi.csv");
        fs::write(&empty, "").unwrap();
        fs::write(&good, "日付,田中\n10/1(水),9:00〜13:00\n").unwrap();

        let outcome = runner().collect(dir).unwrap();
        assert_eq!(outcome.report.documents_found, 2);
        assert_eq!(outcome.report.documents_processed, 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].path, empty.display().to_string());
        assert_eq!(outcome.canonical.len(), 1);
    }
}
