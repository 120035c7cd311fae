//! Document-level metadata derived from roster filenames.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::FallbackPlan;

/// Metadata shared by every shift extracted from one document.
///
/// Roster exports are named `<label>_<YYYYMMDD>-<YYYYMMDD>_<store+tokens>`,
/// e.g. `ROSTER_20251001-20251031_Stand+Banh+Mi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Store name from the filename, `+` replaced by spaces.
    pub store_name: String,
    /// Plan year (from the period start).
    pub plan_year: i32,
    /// Plan month (from the period start).
    pub plan_month: u32,
    /// First day of the roster period, if the filename carried one.
    pub period_start: Option<NaiveDate>,
    /// Last day of the roster period, if the filename carried one.
    pub period_end: Option<NaiveDate>,
}

impl DocumentMeta {
    /// Builds metadata from a document path, using its file stem.
    pub fn from_path(path: &Path, fallback: &FallbackPlan) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_stem(&stem, fallback)
    }

    /// Builds metadata from a filename stem.
    ///
    /// Names that do not follow the convention fall back to the configured
    /// plan period and store, with a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_ingest::config::ConfigLoader;
    /// use roster_ingest::models::DocumentMeta;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// let fallback = &loader.config().extraction().fallback;
    ///
    /// let meta = DocumentMeta::from_stem("ROSTER_20251001-20251031_Stand+Banh+Mi", fallback);
    /// assert_eq!(meta.store_name, "Stand Banh Mi");
    /// assert_eq!((meta.plan_year, meta.plan_month), (2025, 10));
    /// ```
    pub fn from_stem(stem: &str, fallback: &FallbackPlan) -> Self {
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() >= 3 {
            let store_name = parts[2].replace('+', " ");
            let mut range = parts[1].splitn(2, '-');
            let start_token = range.next().unwrap_or_default();
            let end_token = range.next().unwrap_or_default();

            if let Some((plan_year, plan_month)) = parse_year_month(start_token) {
                return Self {
                    store_name,
                    plan_year,
                    plan_month,
                    period_start: parse_compact_date(start_token),
                    period_end: parse_compact_date(end_token),
                };
            }

            warn!(
                document = %stem,
                period = %parts[1],
                "Unrecognized plan period in filename, using fallback period"
            );
            return Self {
                store_name,
                ..Self::fallback(fallback)
            };
        }

        warn!(
            document = %stem,
            "Filename does not follow <label>_<period>_<store>, using fallback metadata"
        );
        Self::fallback(fallback)
    }

    fn fallback(fallback: &FallbackPlan) -> Self {
        Self {
            store_name: fallback.store_name.clone(),
            plan_year: fallback.plan_year,
            plan_month: fallback.plan_month,
            period_start: None,
            period_end: None,
        }
    }

    /// Resolves a `month/day` pair from a body row to a calendar date.
    ///
    /// The plan year is used unless the date would fall before the period
    /// start while the following year still lies inside the period (a
    /// December-to-January roster). Returns `None` for impossible dates.
    pub fn resolve_date(&self, month: u32, day: u32) -> Option<NaiveDate> {
        let candidate = NaiveDate::from_ymd_opt(self.plan_year, month, day)?;

        if let Some(start) = self.period_start {
            if candidate < start {
                if let Some(next_year) = NaiveDate::from_ymd_opt(candidate.year() + 1, month, day) {
                    let within_end = self.period_end.is_none_or(|end| next_year <= end);
                    if within_end {
                        return Some(next_year);
                    }
                }
            }
        }

        Some(candidate)
    }
}

fn all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_year_month(token: &str) -> Option<(i32, u32)> {
    if token.len() < 6 || !all_digits(token) {
        return None;
    }
    let year: i32 = token[..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

fn parse_compact_date(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !all_digits(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> FallbackPlan {
        FallbackPlan {
            plan_year: 2025,
            plan_month: 10,
            store_name: "Unknown".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_conventional_filename() {
        let meta = DocumentMeta::from_stem("ROSTER_20251001-20251031_Stand+Banh+Mi", &fallback());

        assert_eq!(meta.store_name, "Stand Banh Mi");
        assert_eq!(meta.plan_year, 2025);
        assert_eq!(meta.plan_month, 10);
        assert_eq!(meta.period_start, Some(date(2025, 10, 1)));
        assert_eq!(meta.period_end, Some(date(2025, 10, 31)));
    }

    #[test]
    fn test_from_path_uses_stem() {
        let meta = DocumentMeta::from_path(
            Path::new("/data/rev3_20250801-20250831_Atelier.pdf"),
            &fallback(),
        );
        assert_eq!(meta.store_name, "Atelier");
        assert_eq!(meta.plan_month, 8);
    }

    #[test]
    fn test_short_filename_uses_fallback() {
        let meta = DocumentMeta::from_stem("scan", &fallback());

        assert_eq!(meta.store_name, "Unknown");
        assert_eq!((meta.plan_year, meta.plan_month), (2025, 10));
        assert_eq!(meta.period_start, None);
    }

    #[test]
    fn test_bad_period_keeps_store() {
        let meta = DocumentMeta::from_stem("ROSTER_october_Atelier", &fallback());

        assert_eq!(meta.store_name, "Atelier");
        assert_eq!((meta.plan_year, meta.plan_month), (2025, 10));
    }

    #[test]
    fn test_resolve_date_in_plan_year() {
        let meta = DocumentMeta::from_stem("R_20251001-20251031_Atelier", &fallback());
        assert_eq!(meta.resolve_date(10, 1), Some(date(2025, 10, 1)));
    }

    #[test]
    fn test_resolve_date_rolls_into_next_year() {
        let meta = DocumentMeta::from_stem("R_20251201-20260131_Atelier", &fallback());
        assert_eq!(meta.resolve_date(12, 31), Some(date(2025, 12, 31)));
        assert_eq!(meta.resolve_date(1, 5), Some(date(2026, 1, 5)));
    }

    #[test]
    fn test_resolve_date_before_period_without_rollover() {
        let meta = DocumentMeta::from_stem("R_20251201-20251231_Atelier", &fallback());
        assert_eq!(meta.resolve_date(11, 30), Some(date(2025, 11, 30)));
    }

    #[test]
    fn test_resolve_impossible_date() {
        let meta = DocumentMeta::from_stem("R_20250201-20250228_Atelier", &fallback());
        assert_eq!(meta.resolve_date(2, 30), None);
    }
}
