//! CSV export and import.
//!
//! Every output file is serialized into memory first and written with a
//! single `fs::write` at the end, so a failure never leaves half a file
//! behind from this run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{RosterError, RosterResult};
use crate::models::{EmploymentClass, ShiftRecord};
use crate::normalize::format_time;

use super::CanonicalShiftSet;

/// Column order of the shift CSV.
pub const SHIFT_CSV_HEADERS: [&str; 12] = [
    "tenant_code",
    "store_name",
    "plan_year",
    "plan_month",
    "shift_date",
    "staff_name",
    "employment_type",
    "work_location",
    "start_time",
    "end_time",
    "break_minutes",
    "notes",
];

/// Serializes rows to CSV bytes with an explicit header row.
///
/// The header is written even when `rows` is empty.
pub fn records_to_csv<T: Serialize>(headers: &[&str], rows: &[T]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Serializes `rows` and writes them to `path` in one write.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`RosterError::OutputUnwritable`] if serialization or the write
/// fails.
pub fn write_records<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> RosterResult<()> {
    let unwritable = |message: String| RosterError::OutputUnwritable {
        path: path.display().to_string(),
        message,
    };

    let bytes = records_to_csv(headers, rows).map_err(|e| unwritable(e.to_string()))?;
    write_bytes(path, &bytes)?;

    info!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Writes `bytes` to `path`, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> RosterResult<()> {
    let unwritable = |e: std::io::Error| RosterError::OutputUnwritable {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(unwritable)?;
    }
    fs::write(path, bytes).map_err(unwritable)
}

/// Returns the canonical export form of the set: times as `HH:MM:SS`.
pub fn canonical_rows(set: &CanonicalShiftSet) -> Vec<ShiftRecord> {
    set.records()
        .iter()
        .map(|record| ShiftRecord {
            start_time: format_time(&record.start_time),
            end_time: format_time(&record.end_time),
            ..record.clone()
        })
        .collect()
}

/// Writes the canonical shift CSV.
pub fn write_canonical_csv(path: &Path, set: &CanonicalShiftSet) -> RosterResult<()> {
    write_records(path, &SHIFT_CSV_HEADERS, &canonical_rows(set))
}

/// Writes every extracted record before deduplication, times as written.
pub fn write_raw_csv(path: &Path, records: &[ShiftRecord]) -> RosterResult<()> {
    write_records(path, &SHIFT_CSV_HEADERS, records)
}

/// Reads a shift CSV leniently.
///
/// Columns are found by header name, so extra or reordered columns are fine
/// and missing ones read as empty. Malformed numbers become 0, unknown
/// employment codes become [`EmploymentClass::Hourly`], and rows with an
/// unparseable `shift_date` are skipped; each case logs a warning.
///
/// # Errors
///
/// Returns [`RosterError::InputNotFound`] if the file does not exist and
/// [`RosterError::Csv`] if it is not readable as CSV.
pub fn read_shift_csv(path: &Path) -> RosterResult<Vec<ShiftRecord>> {
    if !path.exists() {
        return Err(RosterError::InputNotFound {
            path: path.display().to_string(),
        });
    }
    let csv_error = |e: csv::Error| RosterError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let columns: HashMap<String, usize> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), index))
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let line = index + 2;
        let field = |name: &str| {
            columns
                .get(name)
                .and_then(|&i| row.get(i))
                .unwrap_or_default()
                .trim()
        };

        let Ok(shift_date) = NaiveDate::parse_from_str(field("shift_date"), "%Y-%m-%d") else {
            warn!(
                path = %path.display(),
                line,
                value = field("shift_date"),
                "Skipping row with unparseable shift_date"
            );
            continue;
        };

        let employment_type = EmploymentClass::from_code(field("employment_type")).unwrap_or_else(|| {
            warn!(
                path = %path.display(),
                line,
                value = field("employment_type"),
                "Unknown employment type, treating as HOURLY"
            );
            EmploymentClass::Hourly
        });

        records.push(ShiftRecord {
            tenant_code: field("tenant_code").to_string(),
            store_name: field("store_name").to_string(),
            plan_year: number_or_zero(field("plan_year"), "plan_year", line),
            plan_month: number_or_zero(field("plan_month"), "plan_month", line),
            shift_date,
            staff_name: field("staff_name").to_string(),
            employment_type,
            work_location: field("work_location").to_string(),
            start_time: field("start_time").to_string(),
            end_time: field("end_time").to_string(),
            break_minutes: number_or_zero(field("break_minutes"), "break_minutes", line),
            notes: field("notes").to_string(),
        });
    }

    info!(path = %path.display(), rows = records.len(), "Read shift CSV");
    Ok(records)
}

fn number_or_zero<T>(raw: &str, column: &str, line: usize) -> T
where
    T: std::str::FromStr + Default,
{
    raw.parse().unwrap_or_else(|_| {
        warn!(column, line, value = raw, "Malformed number, using 0");
        T::default()
    })
}
