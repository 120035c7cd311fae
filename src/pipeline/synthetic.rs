//! Synthetic downstream datasets for one canonical shift set.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::RosterConfig;
use crate::error::{RosterError, RosterResult};
use crate::models::{PayrollRecord, PayrollStatement, SalesActual, SalesForecast, ShiftRecord, WorkHoursRecord};

use super::export::{write_bytes, write_records};
use super::{
    StaffDirectory, VarianceSource, count_store_months, estimate_sales, generate_payroll,
    simulate_work_hours,
};

/// Work hours, payroll and sales derived from one set of shifts.
#[derive(Debug, Clone, Default)]
pub struct DerivedDatasets {
    /// One row per shift.
    pub work_hours: Vec<WorkHoursRecord>,
    /// One statement per staff-month.
    pub payroll: Vec<PayrollStatement>,
    /// One row per store-month.
    pub sales_actual: Vec<SalesActual>,
    /// One row per store-month.
    pub sales_forecast: Vec<SalesForecast>,
}

/// Work-hours rows.
pub const WORK_HOURS_FILE: &str = "work_hours.csv";
/// Payroll rows.
pub const PAYROLL_FILE: &str = "payroll.csv";
/// Payroll audit steps as JSON.
pub const PAYROLL_AUDIT_FILE: &str = "payroll_audit.json";
/// Sales actuals.
pub const SALES_ACTUAL_FILE: &str = "sales_actual.csv";
/// Sales forecasts.
pub const SALES_FORECAST_FILE: &str = "sales_forecast.csv";

const WORK_HOURS_HEADERS: [&str; 17] = [
    "shift_id",
    "year",
    "month",
    "date",
    "staff_id",
    "staff_name",
    "scheduled_start",
    "scheduled_end",
    "actual_start",
    "actual_end",
    "scheduled_hours",
    "actual_hours",
    "break_minutes",
    "overtime_minutes",
    "is_late",
    "is_early_leave",
    "notes",
];

const PAYROLL_HEADERS: [&str; 22] = [
    "payroll_id",
    "year",
    "month",
    "staff_id",
    "staff_name",
    "work_days",
    "work_hours",
    "base_salary",
    "overtime_pay",
    "commute_allowance",
    "other_allowances",
    "gross_salary",
    "health_insurance",
    "pension_insurance",
    "employment_insurance",
    "income_tax",
    "resident_tax",
    "total_deduction",
    "net_salary",
    "payment_date",
    "payment_status",
    "notes",
];

const SALES_ACTUAL_HEADERS: [&str; 8] = [
    "actual_id",
    "year",
    "month",
    "store_id",
    "store_name",
    "actual_sales",
    "daily_average",
    "notes",
];

const SALES_FORECAST_HEADERS: [&str; 9] = [
    "forecast_id",
    "year",
    "month",
    "store_id",
    "store_name",
    "forecasted_sales",
    "required_labor_cost",
    "required_hours",
    "notes",
];

impl DerivedDatasets {
    /// Derives every dataset from `shifts`.
    ///
    /// Work hours draw from `variance` first, then sales, so a seeded source
    /// reproduces the same files for the same input.
    pub fn derive(
        shifts: &[ShiftRecord],
        config: &RosterConfig,
        directory: &mut StaffDirectory,
        variance: &mut dyn VarianceSource,
    ) -> Self {
        let policy = config.policy();
        let work_hours = simulate_work_hours(shifts, &policy.simulation, directory, variance);
        let payroll = generate_payroll(&work_hours, &policy.payroll, directory);
        let (sales_actual, sales_forecast) = estimate_sales(
            &count_store_months(shifts),
            &policy.sales,
            &config.stores().store_ids,
            variance,
        );

        info!(
            shifts = shifts.len(),
            work_hours = work_hours.len(),
            payroll = payroll.len(),
            store_months = sales_actual.len(),
            "Derived synthetic datasets"
        );

        Self {
            work_hours,
            payroll,
            sales_actual,
            sales_forecast,
        }
    }

    /// Payroll rows without their audit steps.
    pub fn payroll_records(&self) -> Vec<PayrollRecord> {
        self.payroll.iter().map(|s| s.record.clone()).collect()
    }

    /// Writes the five output files into `dir` and returns their paths.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::OutputUnwritable`] on the first file that
    /// cannot be written.
    pub fn write_to(&self, dir: &Path) -> RosterResult<Vec<PathBuf>> {
        let work_hours = dir.join(WORK_HOURS_FILE);
        write_records(&work_hours, &WORK_HOURS_HEADERS, &self.work_hours)?;

        let payroll = dir.join(PAYROLL_FILE);
        write_records(&payroll, &PAYROLL_HEADERS, &self.payroll_records())?;

        let audit = dir.join(PAYROLL_AUDIT_FILE);
        let json = serde_json::to_vec_pretty(&self.payroll).map_err(|e| {
            RosterError::OutputUnwritable {
                path: audit.display().to_string(),
                message: e.to_string(),
            }
        })?;
        write_bytes(&audit, &json)?;

        let sales_actual = dir.join(SALES_ACTUAL_FILE);
        write_records(&sales_actual, &SALES_ACTUAL_HEADERS, &self.sales_actual)?;

        let sales_forecast = dir.join(SALES_FORECAST_FILE);
        write_records(&sales_forecast, &SALES_FORECAST_HEADERS, &self.sales_forecast)?;

        Ok(vec![work_hours, payroll, audit, sales_actual, sales_forecast])
    }
}
