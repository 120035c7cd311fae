//! Staff name normalization and employment classification.
//!
//! Roster headers are exported from scanned or generated PDFs and often mix
//! full-width and compatibility glyphs with the canonical ones, so the same
//! person can appear under several code-point sequences. Names are folded with
//! Unicode NFKC and stripped of the employment marker (e.g. `田中(社員)`).

use unicode_normalization::UnicodeNormalization;

use crate::models::EmploymentClass;

/// Classifies a raw header cell by the presence of the employment marker.
///
/// The marker may appear bare or wrapped in half-width or full-width
/// parentheses; all three contain the bare token. This must run on the
/// un-normalized cell, because normalization removes the marker.
///
/// # Examples
///
/// ```
/// use roster_ingest::models::EmploymentClass;
/// use roster_ingest::normalize::classify_employment;
///
/// assert_eq!(classify_employment("田中(社員)", "社員"), EmploymentClass::Salaried);
/// assert_eq!(classify_employment("田中（社員）", "社員"), EmploymentClass::Salaried);
/// assert_eq!(classify_employment("佐藤", "社員"), EmploymentClass::Hourly);
/// ```
pub fn classify_employment(raw_header_cell: &str, marker: &str) -> EmploymentClass {
    if !marker.is_empty() && raw_header_cell.contains(marker) {
        EmploymentClass::Salaried
    } else {
        EmploymentClass::Hourly
    }
}

/// Normalizes a staff display name.
///
/// Applies NFKC, removes the employment marker in both parenthesis styles and
/// bare, and trims surrounding whitespace. The steps are repeated until the
/// text stops changing, which makes the function idempotent even when
/// removing a marker exposes another one or lets NFKC compose characters that
/// were separated by it.
///
/// # Examples
///
/// ```
/// use roster_ingest::normalize::normalize_staff_name;
///
/// assert_eq!(normalize_staff_name(" 田中(社員) ", "社員"), "田中");
/// assert_eq!(normalize_staff_name("ＡＢＣ", "社員"), "ABC");
/// ```
pub fn normalize_staff_name(raw: &str, marker: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = normalize_once(&current, marker);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_once(raw: &str, marker: &str) -> String {
    let mut name: String = raw.nfkc().collect();

    if !marker.is_empty() {
        name = name
            .replace(&format!("（{}）", marker), "")
            .replace(&format!("({})", marker), "")
            .replace(marker, "");
    }

    name.trim().to_string()
}
