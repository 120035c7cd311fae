//! Shift cell expansion.
//!
//! A body cell may be blank, a placeholder, or hold one or more time ranges
//! such as `渋谷9:00〜13:00 18:00〜22:00`, optionally prefixed by a work
//! location.

use regex::Regex;

use crate::config::ExtractionConfig;
use crate::error::{RosterError, RosterResult};

/// One `start<dash>end` range found in a cell, times as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// Start time (`H:MM` or `HH:MM`).
    pub start: String,
    /// End time (`H:MM` or `HH:MM`).
    pub end: String,
}

/// The shifts encoded in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellShifts {
    /// Work-location prefix before the first time, empty if none.
    pub work_location: String,
    /// Every non-overlapping time range, in order.
    pub ranges: Vec<TimeRange>,
}

/// Parses shift cells using the configured placeholders and dash glyphs.
#[derive(Debug, Clone)]
pub struct CellParser {
    time_range: Regex,
    placeholders: Vec<String>,
}

impl CellParser {
    /// Builds the parser from extraction.yaml.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidConfig`] if no dash glyphs are configured.
    pub fn new(config: &ExtractionConfig) -> RosterResult<Self> {
        let dashes: Vec<String> = config
            .dash_glyphs
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect();
        if dashes.is_empty() {
            return Err(RosterError::InvalidConfig {
                message: "extraction.dash_glyphs must name at least one glyph".to_string(),
            });
        }

        // The start hour must not continue a longer digit run.
        let pattern = format!(
            r"(?:^|[^0-9])([0-9]{{1,2}}:[0-9]{{2}})\s*(?:{})\s*([0-9]{{1,2}}:[0-9]{{2}})",
            dashes.join("|")
        );
        let time_range = Regex::new(&pattern).map_err(|e| RosterError::InvalidConfig {
            message: format!("extraction.dash_glyphs: {}", e),
        })?;

        Ok(Self {
            time_range,
            placeholders: config.placeholder_cells.clone(),
        })
    }

    /// Returns true for cells that mean "no shift".
    pub fn is_placeholder(&self, cell: &str) -> bool {
        let trimmed = cell.trim();
        trimmed.is_empty() || self.placeholders.iter().any(|p| p.trim() == trimmed)
    }

    /// Extracts the shifts in `cell`.
    ///
    /// Returns `None` for placeholders and for cells without any time range
    /// (day-off notes and the like).
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_ingest::config::ConfigLoader;
    /// use roster_ingest::extract::CellParser;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// let parser = CellParser::new(loader.config().extraction()).unwrap();
    ///
    /// let shifts = parser.parse("渋谷9:00〜13:00").unwrap();
    /// assert_eq!(shifts.work_location, "渋谷");
    /// assert_eq!(shifts.ranges[0].start, "9:00");
    /// assert_eq!(shifts.ranges[0].end, "13:00");
    /// assert!(parser.parse("/").is_none());
    /// ```
    pub fn parse(&self, cell: &str) -> Option<CellShifts> {
        if self.is_placeholder(cell) {
            return None;
        }
        let text = cell.trim();

        let mut first_start = None;
        let ranges: Vec<TimeRange> = self
            .time_range
            .captures_iter(text)
            .filter_map(|caps| {
                let start = caps.get(1)?;
                first_start.get_or_insert(start.start());
                Some(TimeRange {
                    start: caps[1].to_string(),
                    end: caps[2].to_string(),
                })
            })
            .collect();

        let first_start = first_start?;
        Some(CellShifts {
            work_location: location_prefix(&text[..first_start]),
            ranges,
        })
    }
}

/// Returns the trailing run of the prefix that holds no digits or colons.
fn location_prefix(prefix: &str) -> String {
    let start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, c)| !is_digit_like(*c) && *c != ':' && *c != '：')
        .last()
        .map(|(index, _)| index)
        .unwrap_or(prefix.len());

    prefix[start..].trim().to_string()
}

fn is_digit_like(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn parser() -> CellParser {
        let loader = ConfigLoader::builtin().unwrap();
        CellParser::new(loader.config().extraction()).unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// CE-001: two ranges in one cell are two shifts
    #[test]
    fn test_double_shift_cell() {
        let shifts = parser().parse("9:00〜13:00 18:00〜22:00").unwrap();

        assert_eq!(shifts.ranges, vec![range("9:00", "13:00"), range("18:00", "22:00")]);
        assert_eq!(shifts.work_location, "");
    }

    #[test]
    fn test_location_prefix() {
        let shifts = parser().parse(" 渋谷 9:00〜13:00").unwrap();
        assert_eq!(shifts.work_location, "渋谷");
    }

    #[test]
    fn test_location_prefix_stops_at_digits() {
        let shifts = parser().parse("2F祐天寺10:00〜15:00").unwrap();
        assert_eq!(shifts.work_location, "F祐天寺");
    }

    #[test]
    fn test_start_hour_not_cut_from_longer_number() {
        let p = parser();
        assert!(p.parse("123:00〜13:00").is_none());

        let shifts = p.parse("渋谷9:00〜13:00").unwrap();
        assert_eq!(shifts.work_location, "渋谷");
        assert_eq!(shifts.ranges, vec![range("9:00", "13:00")]);

        let shifts = p.parse("9:00〜13:00/14:00〜18:00").unwrap();
        assert_eq!(shifts.ranges, vec![range("9:00", "13:00"), range("14:00", "18:00")]);
    }

    #[test]
    fn test_alternate_dash_glyphs() {
        let p = parser();
        assert_eq!(p.parse("9:00～13:00").unwrap().ranges, vec![range("9:00", "13:00")]);
        assert_eq!(p.parse("9:00~13:00").unwrap().ranges, vec![range("9:00", "13:00")]);
        assert_eq!(p.parse("9:00-13:00").unwrap().ranges, vec![range("9:00", "13:00")]);
        assert_eq!(p.parse("9:00 〜 13:00").unwrap().ranges, vec![range("9:00", "13:00")]);
    }

    #[test]
    fn test_placeholders() {
        let p = parser();
        assert!(p.parse("").is_none());
        assert!(p.parse(" / ").is_none());
        assert!(p.parse("-").is_none());
        assert!(p.is_placeholder("   "));
        assert!(!p.is_placeholder("休"));
    }

    #[test]
    fn test_cell_without_time_has_no_shifts() {
        assert!(parser().parse("休み").is_none());
        assert!(parser().parse("9:00").is_none());
    }

    #[test]
    fn test_unconfigured_dash_is_not_a_range() {
        let config = ExtractionConfig {
            dash_glyphs: "〜".to_string(),
            ..ConfigLoader::builtin().unwrap().config().extraction().clone()
        };
        let p = CellParser::new(&config).unwrap();
        assert!(p.parse("9:00-13:00").is_none());
    }

    #[test]
    fn test_empty_dash_glyphs_rejected() {
        let config = ExtractionConfig {
            dash_glyphs: " ".to_string(),
            ..ConfigLoader::builtin().unwrap().config().extraction().clone()
        };
        assert!(matches!(
            CellParser::new(&config),
            Err(RosterError::InvalidConfig { .. })
        ));
    }
}
