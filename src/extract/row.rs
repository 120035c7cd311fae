//! Body row classification.

use std::sync::LazyLock;

use regex::Regex;

static ROW_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]{1,2})\s*/\s*([0-9]{1,2})\s*[(（]([^)）]+)[)）]").expect("row date pattern")
});

/// The `M/D (weekday)` label of a body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDate {
    /// Month number as written.
    pub month: u32,
    /// Day number as written.
    pub day: u32,
    /// Weekday token between the parentheses.
    pub weekday: String,
}

/// Parses the first cell of a body row.
///
/// Accepts half-width and full-width parentheses around the weekday. Rows
/// whose first cell does not match (subtotals, notes) return `None` and are
/// skipped by the extractor.
///
/// # Examples
///
/// ```
/// use roster_ingest::extract::parse_row_date;
///
/// let date = parse_row_date("10/1(水)").unwrap();
/// assert_eq!((date.month, date.day), (10, 1));
/// assert_eq!(date.weekday, "水");
/// assert!(parse_row_date("合計").is_none());
/// ```
pub fn parse_row_date(cell: &str) -> Option<RowDate> {
    let caps = ROW_DATE.captures(cell)?;
    Some(RowDate {
        month: caps[1].parse().ok()?,
        day: caps[2].parse().ok()?,
        weekday: caps[3].trim().to_string(),
    })
}
