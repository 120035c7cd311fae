//! Shift record model and related types.
//!
//! This module defines [`ShiftRecord`], the canonical record emitted for every
//! time range found in a roster cell, together with its deduplication key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::format_time;

/// Represents the employment class inferred from a roster header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmploymentClass {
    /// Salaried staff, marked in the header (written as `MONTHLY`).
    #[serde(rename = "MONTHLY")]
    Salaried,
    /// Hourly staff (written as `HOURLY`).
    #[serde(rename = "HOURLY")]
    Hourly,
}

impl EmploymentClass {
    /// Returns the code used in exported files.
    pub fn code(&self) -> &'static str {
        match self {
            EmploymentClass::Salaried => "MONTHLY",
            EmploymentClass::Hourly => "HOURLY",
        }
    }

    /// Parses an exported employment code.
    ///
    /// Accepts `MONTHLY`/`FULL_TIME` for salaried and `HOURLY`/`PART_TIME` for
    /// hourly staff, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_ingest::models::EmploymentClass;
    ///
    /// assert_eq!(EmploymentClass::from_code("MONTHLY"), Some(EmploymentClass::Salaried));
    /// assert_eq!(EmploymentClass::from_code("part_time"), Some(EmploymentClass::Hourly));
    /// assert_eq!(EmploymentClass::from_code("CONTRACT"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "MONTHLY" | "FULL_TIME" => Some(EmploymentClass::Salaried),
            "HOURLY" | "PART_TIME" => Some(EmploymentClass::Hourly),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmploymentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One scheduled shift extracted from a roster table.
///
/// Field order matches the canonical CSV schema. Records are immutable once
/// emitted by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Tenant code placeholder.
    pub tenant_code: String,
    /// Store name from the document (or the resolved label after dedup).
    pub store_name: String,
    /// Plan year of the source document.
    pub plan_year: i32,
    /// Plan month of the source document.
    pub plan_month: u32,
    /// Date of the shift.
    pub shift_date: NaiveDate,
    /// Normalized staff display name.
    pub staff_name: String,
    /// Employment class of the staff member.
    pub employment_type: EmploymentClass,
    /// Work-location prefix found in the cell, empty if none.
    pub work_location: String,
    /// Start time as written in the cell (`H:MM` or `HH:MM`).
    pub start_time: String,
    /// End time as written in the cell.
    pub end_time: String,
    /// Unpaid break derived from the break policy.
    pub break_minutes: u32,
    /// Free-form notes.
    pub notes: String,
}

impl ShiftRecord {
    /// Returns the deduplication key of this shift.
    ///
    /// Times are compared after [`format_time`], so `9:00` and `09:00` are the
    /// same slot.
    pub fn dedup_key(&self) -> ShiftKey {
        ShiftKey {
            shift_date: self.shift_date,
            staff_name: self.staff_name.clone(),
            start_time: format_time(&self.start_time),
            end_time: format_time(&self.end_time),
        }
    }
}

/// Identity of a shift across documents: `(date, staff, start, end)`.
///
/// The store is deliberately not part of the key: the same person cannot work
/// the exact same slot in two places, so a second occurrence is a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShiftKey {
    /// Date of the shift.
    pub shift_date: NaiveDate,
    /// Normalized staff name.
    pub staff_name: String,
    /// Start time in `HH:MM:SS`.
    pub start_time: String,
    /// End time in `HH:MM:SS`.
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(store: &str, start: &str, end: &str) -> ShiftRecord {
        ShiftRecord {
            tenant_code: "STAND_BANH_MI".to_string(),
            store_name: store.to_string(),
            plan_year: 2025,
            plan_month: 10,
            shift_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            staff_name: "田中".to_string(),
            employment_type: EmploymentClass::Salaried,
            work_location: String::new(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            break_minutes: 0,
            notes: String::new(),
        }
    }

    #[test]
    fn test_dedup_key_ignores_store() {
        let a = make_record("Atelier", "9:00", "13:00");
        let b = make_record("Stand Banh Mi", "9:00", "13:00");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_normalizes_time_shape() {
        let a = make_record("Atelier", "9:00", "13:00");
        let b = make_record("Atelier", "09:00:00", "13:00");
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_eq!(a.dedup_key().start_time, "09:00:00");
    }

    #[test]
    fn test_dedup_key_distinguishes_times() {
        let a = make_record("Atelier", "9:00", "13:00");
        let b = make_record("Atelier", "9:00", "14:00");
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_employment_class_serializes_as_code() {
        let json = serde_json::to_string(&EmploymentClass::Salaried).unwrap();
        assert_eq!(json, "\"MONTHLY\"");
        let parsed: EmploymentClass = serde_json::from_str("\"HOURLY\"").unwrap();
        assert_eq!(parsed, EmploymentClass::Hourly);
    }

    #[test]
    fn test_shift_record_serialization() {
        let record = make_record("Atelier", "9:00", "13:00");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"shift_date\":\"2025-10-01\""));
        let back: ShiftRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
