//! Clock-time parsing, shift durations and the break policy.
//!
//! Roster cells carry wall-clock times such as `9:00` or `22:00`. A shift whose
//! end time is numerically earlier than its start time crosses midnight; the
//! duration calculation adds one day to the end time in that case.

use rust_decimal::Decimal;

use crate::config::{BreakTier, PolicyConfig};

/// Minutes in one day, added to the end time of an overnight shift.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Formats a clock time as `HH:MM:SS`.
///
/// - `""` (or whitespace) becomes `"00:00:00"`
/// - `H:MM` / `HH:MM` is zero-padded and gets `:00` seconds
/// - anything already containing two colons (`HH:MM:SS`) is returned unchanged
/// - any other shape is returned trimmed but otherwise unchanged, so callers must tolerate
///   malformed pass-through
///
/// # Examples
///
/// ```
/// use roster_ingest::normalize::format_time;
///
/// assert_eq!(format_time("9:00"), "09:00:00");
/// assert_eq!(format_time("22:30"), "22:30:00");
/// assert_eq!(format_time("09:00:00"), "09:00:00");
/// assert_eq!(format_time(""), "00:00:00");
/// assert_eq!(format_time("noon"), "noon");
/// ```
pub fn format_time(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "00:00:00".to_string();
    }

    match trimmed.matches(':').count() {
        1 => match trimmed.split_once(':') {
            Some((hours, minutes)) => format!("{:0>2}:{:0>2}:00", hours, minutes),
            None => trimmed.to_string(),
        },
        _ => trimmed.to_string(),
    }
}

/// Parses `H:MM`, `HH:MM` or `HH:MM:SS` into minutes since midnight.
///
/// Hours past 23 are accepted (rosters sometimes write `27:00` for 3am the
/// next day). Seconds are ignored. Returns `None` for anything else.
pub fn parse_clock_minutes(raw: &str) -> Option<i64> {
    let mut parts = raw.trim().split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    if let Some(seconds) = parts.next() {
        if seconds.len() != 2 || !seconds.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    if parts.next().is_some() {
        return None;
    }

    if hours.is_empty() || hours.len() > 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    Some(hours * 60 + minutes)
}

/// Computes the length of a shift in minutes.
///
/// If `end` is earlier than `start` the shift crosses midnight and one day is
/// added to `end` before subtracting; this is the only overnight handling.
///
/// # Examples
///
/// ```
/// use roster_ingest::normalize::compute_duration_minutes;
///
/// assert_eq!(compute_duration_minutes("9:00", "13:00"), Some(240));
/// assert_eq!(compute_duration_minutes("22:00", "02:00"), Some(240));
/// assert_eq!(compute_duration_minutes("9:00", "late"), None);
/// ```
pub fn compute_duration_minutes(start: &str, end: &str) -> Option<i64> {
    let start = parse_clock_minutes(start)?;
    let mut end = parse_clock_minutes(end)?;

    if end < start {
        end += MINUTES_PER_DAY;
    }

    Some(end - start)
}

/// Table-driven break rule.
///
/// Each tier grants `break_minutes` to shifts strictly longer than
/// `over_minutes`; the highest matching tier wins and shifts below every tier
/// get no break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakPolicy {
    tiers: Vec<BreakTier>,
}

impl BreakPolicy {
    /// Creates a policy from tiers in any order.
    pub fn new(mut tiers: Vec<BreakTier>) -> Self {
        tiers.sort_by_key(|tier| tier.over_minutes);
        Self { tiers }
    }

    /// Creates the policy configured in policy.yaml.
    pub fn from_config(policy: &PolicyConfig) -> Self {
        Self::new(policy.breaks.clone())
    }

    /// Returns the break for a shift of the given length.
    pub fn break_minutes(&self, duration_minutes: i64) -> u32 {
        self.tiers
            .iter()
            .rev()
            .find(|tier| duration_minutes > i64::from(tier.over_minutes))
            .map(|tier| tier.break_minutes)
            .unwrap_or(0)
    }
}

/// Derives the unpaid break for a shift duration under `policy`.
///
/// With the shipped policy a shift of up to 300 minutes gets no break and a
/// longer one gets 60 minutes.
pub fn derive_break_minutes(duration_minutes: i64, policy: &BreakPolicy) -> u32 {
    policy.break_minutes(duration_minutes)
}

/// Computes scheduled hours, `(duration - break) / 60`, rounded to one decimal.
///
/// Returns `None` if either time cannot be parsed.
///
/// # Examples
///
/// ```
/// use roster_ingest::normalize::compute_scheduled_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(compute_scheduled_hours("9:00", "18:00", 60), Some(Decimal::new(80, 1)));
/// assert_eq!(compute_scheduled_hours("9:00", "13:20", 0), Some(Decimal::new(43, 1)));
/// ```
pub fn compute_scheduled_hours(start: &str, end: &str, break_minutes: u32) -> Option<Decimal> {
    let duration = compute_duration_minutes(start, end)?;
    Some(minutes_to_hours(duration - i64::from(break_minutes)))
}

/// Converts minutes to hours rounded to one decimal place.
///
/// The result always carries one decimal digit, so `480` minutes renders as `8.0`.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    let mut hours = (Decimal::from(minutes) / Decimal::from(60)).round_dp(1);
    hours.rescale(1);
    hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shipped_policy() -> BreakPolicy {
        BreakPolicy::new(vec![BreakTier {
            over_minutes: 300,
            break_minutes: 60,
        }])
    }

    /// TM-001: overnight shift wraps past midnight
    #[test]
    fn test_overnight_duration() {
        assert_eq!(compute_duration_minutes("22:00", "02:00"), Some(240));
    }

    /// TM-002: break boundary at exactly five hours
    #[test]
    fn test_break_boundary() {
        let policy = shipped_policy();
        assert_eq!(derive_break_minutes(300, &policy), 0);
        assert_eq!(derive_break_minutes(301, &policy), 60);
    }

    #[test]
    fn test_same_day_duration() {
        assert_eq!(compute_duration_minutes("9:00", "18:30"), Some(570));
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(compute_duration_minutes("9:00", "09:00"), Some(0));
    }

    #[test]
    fn test_past_midnight_notation() {
        assert_eq!(compute_duration_minutes("22:00", "27:00"), Some(300));
    }

    #[test]
    fn test_parse_clock_minutes_shapes() {
        assert_eq!(parse_clock_minutes("9:05"), Some(545));
        assert_eq!(parse_clock_minutes("09:05"), Some(545));
        assert_eq!(parse_clock_minutes("09:05:00"), Some(545));
        assert_eq!(parse_clock_minutes("9:5"), None);
        assert_eq!(parse_clock_minutes("9:60"), None);
        assert_eq!(parse_clock_minutes("123:00"), None);
        assert_eq!(parse_clock_minutes(""), None);
        assert_eq!(parse_clock_minutes("1:00:00:00"), None);
    }

    #[test]
    fn test_format_time_shapes() {
        assert_eq!(format_time("9:00"), "09:00:00");
        assert_eq!(format_time("09:00"), "09:00:00");
        assert_eq!(format_time("09:00:00"), "09:00:00");
        assert_eq!(format_time("   "), "00:00:00");
        assert_eq!(format_time("0900"), "0900");
    }

    #[test]
    fn test_multi_tier_policy() {
        let policy = BreakPolicy::new(vec![
            BreakTier {
                over_minutes: 480,
                break_minutes: 90,
            },
            BreakTier {
                over_minutes: 300,
                break_minutes: 60,
            },
        ]);

        assert_eq!(policy.break_minutes(200), 0);
        assert_eq!(policy.break_minutes(360), 60);
        assert_eq!(policy.break_minutes(480), 60);
        assert_eq!(policy.break_minutes(481), 90);
    }

    #[test]
    fn test_empty_policy_never_breaks() {
        let policy = BreakPolicy::new(vec![]);
        assert_eq!(policy.break_minutes(900), 0);
    }

    #[test]
    fn test_minutes_to_hours_keeps_one_decimal() {
        assert_eq!(minutes_to_hours(480).to_string(), "8.0");
        assert_eq!(minutes_to_hours(250).to_string(), "4.2");
        assert_eq!(minutes_to_hours(0).to_string(), "0.0");
    }

    #[test]
    fn test_scheduled_hours_subtracts_break() {
        assert_eq!(
            compute_scheduled_hours("10:00", "19:00", 60),
            Some(Decimal::new(80, 1))
        );
        assert_eq!(
            compute_scheduled_hours("22:00", "02:00", 0),
            Some(Decimal::new(40, 1))
        );
        assert_eq!(compute_scheduled_hours("x", "02:00", 0), None);
    }

    proptest! {
        #[test]
        fn prop_format_time_idempotent(raw in "\\PC{0,12}") {
            let once = format_time(&raw);
            prop_assert_eq!(format_time(&once), once);
        }

        #[test]
        fn prop_format_time_idempotent_on_clock_shapes(h in 0u32..30, m in 0u32..60) {
            let raw = format!("{}:{:02}", h, m);
            let once = format_time(&raw);
            prop_assert_eq!(format_time(&once), once.clone());
            prop_assert_eq!(parse_clock_minutes(&once), parse_clock_minutes(&raw));
        }

        #[test]
        fn prop_duration_within_one_day(start in 0i64..1440, end in 0i64..1440) {
            let start = format!("{}:{:02}", start / 60, start % 60);
            let end = format!("{}:{:02}", end / 60, end % 60);
            let duration = compute_duration_minutes(&start, &end).unwrap();
            prop_assert!((0..MINUTES_PER_DAY).contains(&duration));
        }
    }
}
