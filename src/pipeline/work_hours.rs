//! Simulated attendance derived from scheduled shifts.
//!
//! This is a synthetic-data generator: actual times are the scheduled times
//! perturbed by a [`VarianceSource`], for populating test tenants. It does not
//! ingest real attendance.

use chrono::Datelike;
use tracing::warn;

use crate::config::SimulationConfig;
use crate::models::{ShiftRecord, WorkHoursRecord};
use crate::normalize::{MINUTES_PER_DAY, format_time, minutes_to_hours, parse_clock_minutes};

use super::{StaffDirectory, VarianceSource};

/// Note written on late arrivals.
pub const NOTE_LATE: &str = "late";
/// Note written on early leaves.
pub const NOTE_EARLY_LEAVE: &str = "early leave";

/// Derives one [`WorkHoursRecord`] per shift, in input order.
///
/// For each shift a variance `v` in the configured minute range is drawn;
/// actual hours are `(duration + v - break) / 60` and overtime is `max(0, v)`.
/// When `v` is below the lateness threshold the shift may be flagged late
/// (the start moves later by `|v|`) or, failing that, an early leave (the end
/// moves earlier by `|v|`). Otherwise the end moves by `v`. Shifts whose times
/// do not parse are skipped with a warning.
pub fn simulate_work_hours(
    shifts: &[ShiftRecord],
    config: &SimulationConfig,
    directory: &mut StaffDirectory,
    variance: &mut dyn VarianceSource,
) -> Vec<WorkHoursRecord> {
    let mut records = Vec::with_capacity(shifts.len());

    for shift in shifts {
        let (Some(start), Some(end)) = (
            parse_clock_minutes(&shift.start_time),
            parse_clock_minutes(&shift.end_time),
        ) else {
            warn!(
                date = %shift.shift_date,
                staff = %shift.staff_name,
                start = %shift.start_time,
                end = %shift.end_time,
                "Skipping shift with unparseable times"
            );
            continue;
        };
        let end = if end < start { end + MINUTES_PER_DAY } else { end };
        let duration = end - start;
        let break_minutes = i64::from(shift.break_minutes);

        let offset = variance.offset(config.variance_minutes.min, config.variance_minutes.max);
        let delta = i64::from(offset);

        let below_threshold = offset < config.lateness_threshold_minutes;
        let is_late = below_threshold && variance.chance(config.late_probability);
        let is_early_leave = below_threshold && !is_late && variance.chance(config.early_leave_probability);

        let (actual_start, actual_end) = if is_late {
            (start - delta, end)
        } else {
            (start, end + delta)
        };

        let notes = if is_late {
            NOTE_LATE
        } else if is_early_leave {
            NOTE_EARLY_LEAVE
        } else {
            ""
        };

        let sequence = records.len() + 1;
        records.push(WorkHoursRecord {
            shift_id: format!("SH{}_{:04}", shift.shift_date.format("%Y%m%d"), sequence),
            year: shift.shift_date.year(),
            month: shift.shift_date.month(),
            date: shift.shift_date.day(),
            staff_id: directory.lookup(&shift.staff_name),
            staff_name: shift.staff_name.clone(),
            scheduled_start: format_time(&shift.start_time),
            scheduled_end: format_time(&shift.end_time),
            actual_start: clock_label(actual_start),
            actual_end: clock_label(actual_end),
            scheduled_hours: minutes_to_hours(duration - break_minutes),
            actual_hours: minutes_to_hours(duration + delta - break_minutes),
            break_minutes: shift.break_minutes,
            overtime_minutes: delta.max(0),
            is_late,
            is_early_leave,
            notes: notes.to_string(),
        });
    }

    records
}

/// Formats minutes as `HH:MM`, wrapped into one day.
fn clock_label(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
