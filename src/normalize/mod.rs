//! Normalization of the raw values found in roster tables.
//!
//! This module contains the time and shift normalizer (clock parsing, overnight
//! durations, break policy), staff identity normalization, and store label
//! resolution.

mod identity;
mod store;
mod time;

pub use identity::{classify_employment, normalize_staff_name};
pub use store::{StoreResolution, StoreResolver};
pub use time::{
    BreakPolicy, MINUTES_PER_DAY, compute_duration_minutes, compute_scheduled_hours,
    derive_break_minutes, format_time, minutes_to_hours, parse_clock_minutes,
};
