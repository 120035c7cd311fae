//! Synthetic attendance records derived from scheduled shifts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One simulated attendance row, one-to-one with a canonical shift.
///
/// These rows are produced by the synthetic-data generator: the actual times
/// are the scheduled times perturbed by a [`VarianceSource`], not real
/// attendance data.
///
/// [`VarianceSource`]: crate::pipeline::VarianceSource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursRecord {
    /// Identifier of the form `SH<yyyymmdd>_<nnnn>`.
    pub shift_id: String,
    /// Calendar year of the shift.
    pub year: i32,
    /// Calendar month of the shift.
    pub month: u32,
    /// Day of month of the shift.
    pub date: u32,
    /// Staff identifier from the staff directory, empty if unknown.
    pub staff_id: Option<String>,
    /// Normalized staff name.
    pub staff_name: String,
    /// Scheduled start (`HH:MM:SS`).
    pub scheduled_start: String,
    /// Scheduled end (`HH:MM:SS`).
    pub scheduled_end: String,
    /// Simulated actual start (`HH:MM`).
    pub actual_start: String,
    /// Simulated actual end (`HH:MM`).
    pub actual_end: String,
    /// Scheduled hours net of break, one decimal.
    pub scheduled_hours: Decimal,
    /// Simulated hours net of break, one decimal.
    pub actual_hours: Decimal,
    /// Unpaid break in minutes.
    pub break_minutes: u32,
    /// Minutes worked beyond the schedule.
    pub overtime_minutes: i64,
    /// Whether the simulated start was late.
    #[serde(serialize_with = "upper_bool", deserialize_with = "parse_upper_bool")]
    pub is_late: bool,
    /// Whether the simulated end was early.
    #[serde(serialize_with = "upper_bool", deserialize_with = "parse_upper_bool")]
    pub is_early_leave: bool,
    /// `late`, `early leave` or empty.
    pub notes: String,
}

impl WorkHoursRecord {
    /// Returns the calendar date of the shift.
    pub fn shift_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.date)
    }
}

fn upper_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "TRUE" } else { "FALSE" })
}

fn parse_upper_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorkHoursRecord {
        WorkHoursRecord {
            shift_id: "SH20251001_0001".to_string(),
            year: 2025,
            month: 10,
            date: 1,
            staff_id: None,
            staff_name: "田中".to_string(),
            scheduled_start: "09:00:00".to_string(),
            scheduled_end: "13:00:00".to_string(),
            actual_start: "09:00".to_string(),
            actual_end: "13:05".to_string(),
            scheduled_hours: Decimal::new(40, 1),
            actual_hours: Decimal::new(41, 1),
            break_minutes: 0,
            overtime_minutes: 5,
            is_late: false,
            is_early_leave: true,
            notes: String::new(),
        }
    }

    #[test]
    fn test_flags_serialize_upper_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["is_late"], "FALSE");
        assert_eq!(json["is_early_leave"], "TRUE");
        assert_eq!(json["staff_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_flags_deserialize() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: WorkHoursRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_shift_date() {
        assert_eq!(sample().shift_date(), NaiveDate::from_ymd_opt(2025, 10, 1));
    }
}
