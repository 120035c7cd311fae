//! Grid-to-record extraction.
//!
//! [`TableExtractor`] holds no per-document state: each call classifies the
//! header of one grid, walks its dated body rows, and expands every staff cell
//! into shift records.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{ExtractionConfig, RosterConfig};
use crate::error::{RosterError, RosterResult};
use crate::models::{DocumentMeta, ShiftRecord, StaffColumn};
use crate::normalize::{BreakPolicy, compute_duration_minutes};

use super::cell::CellParser;
use super::header::{DATE_COLUMN, classify_header};
use super::row::parse_row_date;
use super::source::{Grid, TableSource};

/// Everything extracted from one document.
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// Metadata derived from the document filename.
    pub meta: DocumentMeta,
    /// Number of grids found on the first page.
    pub grids: usize,
    /// Records in emission order.
    pub records: Vec<ShiftRecord>,
}

/// Extracts shift records from roster grids.
///
/// # Example
///
/// ```
/// use roster_ingest::config::ConfigLoader;
/// use roster_ingest::extract::{Grid, TableExtractor};
/// use roster_ingest::models::DocumentMeta;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let extractor = TableExtractor::new(loader.config()).unwrap();
/// let meta = DocumentMeta::from_stem(
///     "ROSTER_20251001-20251031_Stand+Banh+Mi",
///     &loader.config().extraction().fallback,
/// );
///
/// let grid = Grid::new(vec![
///     vec!["日付".to_string(), "田中(社員)".to_string()],
///     vec!["10/1(水)".to_string(), "渋谷9:00〜13:00".to_string()],
/// ]);
///
/// let records = extractor.extract_grid(&grid, &meta);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].staff_name, "田中");
/// assert_eq!(records[0].shift_date.to_string(), "2025-10-01");
/// ```
#[derive(Debug, Clone)]
pub struct TableExtractor {
    extraction: ExtractionConfig,
    cells: CellParser,
    breaks: BreakPolicy,
}

impl TableExtractor {
    /// Creates an extractor from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidConfig`] if the dash glyphs do not form a
    /// usable pattern.
    pub fn new(config: &RosterConfig) -> RosterResult<Self> {
        Ok(Self {
            extraction: config.extraction().clone(),
            cells: CellParser::new(config.extraction())?,
            breaks: BreakPolicy::from_config(config.policy()),
        })
    }

    /// Extracts the shift records of one grid.
    ///
    /// Rows whose first cell is not a `M/D (weekday)` label, or whose date does
    /// not exist in the calendar, are skipped without error.
    pub fn extract_grid(&self, grid: &Grid, meta: &DocumentMeta) -> Vec<ShiftRecord> {
        let staff = classify_header(grid, &self.extraction);
        if staff.is_empty() {
            debug!(store = %meta.store_name, "Grid header names no staff");
            return Vec::new();
        }

        let mut records = Vec::new();
        for row in grid.body() {
            if row.len() < 2 {
                continue;
            }
            let Some(row_date) = row.get(DATE_COLUMN).and_then(|cell| parse_row_date(cell)) else {
                continue;
            };
            let Some(shift_date) = meta.resolve_date(row_date.month, row_date.day) else {
                debug!(
                    month = row_date.month,
                    day = row_date.day,
                    "Skipping row with impossible date"
                );
                continue;
            };

            for column in &staff {
                if let Some(cell) = row.get(column.column) {
                    self.expand_cell(cell, column, shift_date, meta, &mut records);
                }
            }
        }

        records
    }

    fn expand_cell(
        &self,
        cell: &str,
        column: &StaffColumn,
        shift_date: chrono::NaiveDate,
        meta: &DocumentMeta,
        records: &mut Vec<ShiftRecord>,
    ) {
        let Some(shifts) = self.cells.parse(cell) else {
            return;
        };

        for range in shifts.ranges {
            let Some(duration) = compute_duration_minutes(&range.start, &range.end) else {
                warn!(
                    staff = %column.identity.display_name,
                    date = %shift_date,
                    start = %range.start,
                    end = %range.end,
                    "Skipping time range with an invalid clock time"
                );
                continue;
            };

            records.push(ShiftRecord {
                tenant_code: self.extraction.tenant_code.clone(),
                store_name: meta.store_name.clone(),
                plan_year: meta.plan_year,
                plan_month: meta.plan_month,
                shift_date,
                staff_name: column.identity.display_name.clone(),
                employment_type: column.identity.employment_class,
                work_location: shifts.work_location.clone(),
                start_time: range.start,
                end_time: range.end,
                break_minutes: self.breaks.break_minutes(duration),
                notes: String::new(),
            });
        }
    }

    /// Reads one document through `source` and extracts every grid on it.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DocumentUnreadable`] if the source cannot read
    /// the file and [`RosterError::NoTables`] if it finds no grid. Both are
    /// document-level errors.
    pub fn extract_document(
        &self,
        source: &dyn TableSource,
        path: &Path,
    ) -> RosterResult<DocumentExtraction> {
        let meta = DocumentMeta::from_path(path, &self.extraction.fallback);
        let grids = source.extract_tables(path)?;
        if grids.iter().all(Grid::is_empty) {
            return Err(RosterError::NoTables {
                path: path.display().to_string(),
            });
        }

        let records: Vec<ShiftRecord> = grids
            .iter()
            .flat_map(|grid| self.extract_grid(grid, &meta))
            .collect();

        info!(
            document = %path.display(),
            store = %meta.store_name,
            grids = grids.len(),
            rows = records.len(),
            "Extracted document"
        );

        Ok(DocumentExtraction {
            meta,
            grids: grids.len(),
            records,
        })
    }
}
