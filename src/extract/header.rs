//! Header row classification.
//!
//! Row 0 of a roster grid names the staff members, one per column, mixed with
//! store banners and generic labels that must be ignored. Every surviving
//! staff member keeps the index of the column it came from, so a skipped
//! cell never shifts the columns after it.

use crate::config::ExtractionConfig;
use crate::models::{StaffColumn, StaffIdentity};
use crate::normalize::{classify_employment, normalize_staff_name};

use super::Grid;

/// Column holding the row dates; never a staff column.
pub const DATE_COLUMN: usize = 0;

/// Classifies the header row of `grid` into staff columns.
///
/// A header cell is dropped when it is blank, contains any configured skip
/// keyword, or normalizes to an empty name. Employment is classified on the
/// raw cell before the name is normalized.
///
/// # Examples
///
/// ```
/// use roster_ingest::config::ConfigLoader;
/// use roster_ingest::extract::{classify_header, Grid};
/// use roster_ingest::models::EmploymentClass;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let grid = Grid::new(vec![vec![
///     "日付 / 日".to_string(),
///     "渋谷".to_string(),
///     "田中(社員)".to_string(),
/// ]]);
///
/// let staff = classify_header(&grid, loader.config().extraction());
/// assert_eq!(staff.len(), 1);
/// assert_eq!(staff[0].column, 2);
/// assert_eq!(staff[0].identity.display_name, "田中");
/// assert_eq!(staff[0].identity.employment_class, EmploymentClass::Salaried);
/// ```
pub fn classify_header(grid: &Grid, config: &ExtractionConfig) -> Vec<StaffColumn> {
    grid.row_cells(0)
        .filter(|cell| cell.column != DATE_COLUMN)
        .filter_map(|cell| {
            let raw = cell.text.trim();
            if raw.is_empty() || is_skipped(raw, &config.skip_keywords) {
                return None;
            }

            let employment_class = classify_employment(raw, &config.employment_marker);
            let display_name = normalize_staff_name(raw, &config.employment_marker);
            if display_name.is_empty() {
                return None;
            }

            Some(StaffColumn {
                column: cell.column,
                identity: StaffIdentity {
                    display_name,
                    employment_class,
                },
            })
        })
        .collect()
}

fn is_skipped(cell: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && cell.contains(keyword.as_str()))
}
