//! Store sales estimates derived from shift counts.
//!
//! Synthetic data: sales are estimated from how many shifts a store staffed
//! in a month, then perturbed by a [`VarianceSource`].

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::SalesConfig;
use crate::models::{SalesActual, SalesForecast, ShiftRecord};

use super::VarianceSource;
use super::payroll::truncate_yen;

/// Number of shifts one store staffed in one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMonth {
    /// Resolved store label.
    pub store_name: String,
    /// Year of the shift dates.
    pub year: i32,
    /// Month of the shift dates.
    pub month: u32,
    /// Number of shifts.
    pub shift_count: u32,
}

/// Returns the number of days in a month, or `None` for an invalid month.
///
/// # Examples
///
/// ```
/// use roster_ingest::pipeline::days_in_month;
///
/// assert_eq!(days_in_month(2025, 10), Some(31));
/// assert_eq!(days_in_month(2024, 2), Some(29));
/// assert_eq!(days_in_month(2025, 13), None);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Counts shifts per `(store_name, year, month)`, sorted by that key.
pub fn count_store_months(shifts: &[ShiftRecord]) -> Vec<StoreMonth> {
    let mut counts: BTreeMap<(String, i32, u32), u32> = BTreeMap::new();
    for shift in shifts {
        let key = (
            shift.store_name.clone(),
            shift.shift_date.year(),
            shift.shift_date.month(),
        );
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((store_name, year, month), shift_count)| StoreMonth {
            store_name,
            year,
            month,
            shift_count,
        })
        .collect()
}

/// Estimates actual and forecast sales for each store-month.
///
/// `estimated = shifts × hours_per_shift × sales_per_hour`, then
/// `actual = estimated × (1 + v)` with `v` drawn in ± `actual_variance_bp`
/// basis points. The forecast is `actual × forecast_ratio`, its labor budget
/// `forecast × labor_cost_ratio`, and the required hours that budget divided
/// by `labor_hourly_rate`. Each figure is truncated on its own. Store labels
/// missing from `store_ids` are written without an id and logged.
pub fn estimate_sales(
    months: &[StoreMonth],
    config: &SalesConfig,
    store_ids: &HashMap<String, i64>,
    variance: &mut dyn VarianceSource,
) -> (Vec<SalesActual>, Vec<SalesForecast>) {
    let mut actuals = Vec::with_capacity(months.len());
    let mut forecasts = Vec::with_capacity(months.len());

    for (month, sequence) in months.iter().zip(1..) {
        let store_id = store_ids.get(&month.store_name).copied();
        if store_id.is_none() {
            warn!(store = %month.store_name, "Store label has no store id");
        }

        let estimated =
            Decimal::from(month.shift_count) * config.hours_per_shift * config.sales_per_hour;
        let variance_bp = variance.offset(-config.actual_variance_bp, config.actual_variance_bp);
        let actual_sales = truncate_yen(estimated * (Decimal::ONE + basis_points(variance_bp)));

        let days = days_in_month(month.year, month.month).unwrap_or(30);
        let daily_average = truncate_yen(Decimal::from(actual_sales) / Decimal::from(days));

        let plan_bp = variance.offset(-config.plan_ratio_bp, config.plan_ratio_bp);

        actuals.push(SalesActual {
            actual_id: format!("SA{}{:02}_{:02}", month.year, month.month, sequence),
            year: month.year,
            month: month.month,
            store_id,
            store_name: month.store_name.clone(),
            actual_sales,
            daily_average,
            notes: plan_note(plan_bp),
        });

        let forecasted_sales = truncate_yen(Decimal::from(actual_sales) * config.forecast_ratio);
        let required_labor_cost =
            truncate_yen(Decimal::from(forecasted_sales) * config.labor_cost_ratio);
        let required_hours =
            truncate_yen(Decimal::from(required_labor_cost) / config.labor_hourly_rate);

        forecasts.push(SalesForecast {
            forecast_id: format!("SF{}{:02}_{:02}", month.year, month.month, sequence),
            year: month.year,
            month: month.month,
            store_id,
            store_name: month.store_name.clone(),
            forecasted_sales,
            required_labor_cost,
            required_hours,
            notes: format!(
                "regular operation, labor cost ratio {}%",
                (config.labor_cost_ratio * Decimal::from(100)).normalize()
            ),
        });
    }

    (actuals, forecasts)
}

fn basis_points(bp: i32) -> Decimal {
    Decimal::new(i64::from(bp), 4)
}

/// Formats a plan comparison such as `plan +2.5%`.
fn plan_note(bp: i32) -> String {
    let sign = if bp < 0 { '-' } else { '+' };
    let mut percent = Decimal::new(i64::from(bp.abs()), 2).round_dp(1);
    percent.rescale(1);
    format!("plan {}{}%", sign, percent)
}
