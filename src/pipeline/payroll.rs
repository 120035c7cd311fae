//! Monthly payroll estimates.
//!
//! Work-hours rows are aggregated per `(staff_name, year, month)` and priced
//! with fixed rates from policy.yaml. Every line item is truncated to whole
//! yen on its own before it enters a sum (round per line, never once at the
//! end), and each line is recorded as an [`AuditStep`].

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use tracing::warn;

use crate::config::PayrollConfig;
use crate::models::{AuditStep, PayrollRecord, PayrollStatement, WorkHoursRecord};

use super::{StaffDirectory, days_in_month};

/// Payment status written on generated payroll rows.
pub const PAYMENT_STATUS_PAID: &str = "PAID";

/// Hours worked by one staff member in one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyHours {
    /// Normalized staff name.
    pub staff_name: String,
    /// Year.
    pub year: i32,
    /// Month.
    pub month: u32,
    /// Sum of actual hours.
    pub total_hours: Decimal,
    /// Sum of overtime minutes, as hours.
    pub overtime_hours: Decimal,
    /// Number of shifts worked.
    pub days_worked: u32,
}

/// Aggregates work-hours rows per `(staff_name, year, month)`.
///
/// Groups are returned in order of first appearance.
pub fn aggregate_monthly_hours(records: &[WorkHoursRecord]) -> Vec<MonthlyHours> {
    let mut groups: Vec<(MonthlyHours, i64)> = Vec::new();
    let mut index: HashMap<(String, i32, u32), usize> = HashMap::new();

    for record in records {
        let key = (record.staff_name.clone(), record.year, record.month);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((
                MonthlyHours {
                    staff_name: record.staff_name.clone(),
                    year: record.year,
                    month: record.month,
                    total_hours: Decimal::ZERO,
                    overtime_hours: Decimal::ZERO,
                    days_worked: 0,
                },
                0,
            ));
            groups.len() - 1
        });

        let (hours, overtime_minutes) = &mut groups[slot];
        hours.total_hours += record.actual_hours;
        hours.days_worked += 1;
        *overtime_minutes += record.overtime_minutes;
    }

    groups
        .into_iter()
        .map(|(mut hours, overtime_minutes)| {
            hours.overtime_hours = Decimal::from(overtime_minutes) / Decimal::from(60);
            hours
        })
        .collect()
}

/// Calculates one payroll statement.
///
/// # Arguments
///
/// * `hours` - The staff member's hours for the month
/// * `config` - Rates, allowances and deduction fractions
/// * `staff_id` - Id from the staff directory, if known
/// * `sequence` - 1-based sequence used in the payroll id
///
/// # Returns
///
/// A [`PayrollStatement`] whose record satisfies
/// `net_salary = gross_salary - total_deduction`, with one audit step per
/// line item.
///
/// # Examples
///
/// ```
/// use roster_ingest::config::ConfigLoader;
/// use roster_ingest::pipeline::{MonthlyHours, calculate_payroll};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let hours = MonthlyHours {
///     staff_name: "田中".to_string(),
///     year: 2025,
///     month: 10,
///     total_hours: Decimal::from(160),
///     overtime_hours: Decimal::from(10),
///     days_worked: 20,
/// };
///
/// let statement = calculate_payroll(&hours, &loader.config().policy().payroll, None, 1);
/// assert_eq!(statement.record.gross_salary, 217_000);
/// assert_eq!(statement.record.net_salary, 172_949);
/// ```
pub fn calculate_payroll(
    hours: &MonthlyHours,
    config: &PayrollConfig,
    staff_id: Option<String>,
    sequence: u32,
) -> PayrollStatement {
    let mut audit = AuditLog::default();

    let base_salary = audit.line(
        "PAY-BASE",
        "Base Pay",
        json!({"hours": hours.total_hours.to_string(), "hourly_rate": config.hourly_rate.to_string()}),
        hours.total_hours * config.hourly_rate,
        format!("{} hours at {} per hour", hours.total_hours, config.hourly_rate),
    );
    let overtime_pay = audit.line(
        "PAY-OVERTIME",
        "Overtime Pay",
        json!({
            "overtime_hours": hours.overtime_hours.round_dp(4).to_string(),
            "hourly_rate": config.hourly_rate.to_string(),
            "multiplier": config.overtime_multiplier.to_string(),
        }),
        hours.overtime_hours * config.hourly_rate * config.overtime_multiplier,
        format!(
            "{} overtime hours at {} x {}",
            hours.overtime_hours.round_dp(2),
            config.hourly_rate,
            config.overtime_multiplier
        ),
    );
    let commute_allowance = audit.line(
        "PAY-COMMUTE",
        "Commute Allowance",
        json!({"days_worked": hours.days_worked, "per_day": config.commute_per_day.to_string()}),
        Decimal::from(hours.days_worked) * config.commute_per_day,
        format!("{} days at {} per day", hours.days_worked, config.commute_per_day),
    );
    let other_allowances = audit.line(
        "PAY-OTHER",
        "Other Allowances",
        json!({"amount": config.other_allowances.to_string()}),
        config.other_allowances,
        "Flat monthly allowance".to_string(),
    );

    let gross_salary = base_salary + overtime_pay + commute_allowance + other_allowances;
    audit.record(
        "PAY-GROSS",
        "Gross Salary",
        json!({
            "base_salary": base_salary,
            "overtime_pay": overtime_pay,
            "commute_allowance": commute_allowance,
            "other_allowances": other_allowances,
        }),
        json!({"gross_salary": gross_salary}),
        "Sum of truncated pay lines".to_string(),
    );

    let gross = Decimal::from(gross_salary);
    let rates = &config.deductions;
    let mut deduction = |rule_id: &str, rule_name: &str, rate: Decimal| {
        audit.line(
            rule_id,
            rule_name,
            json!({"gross_salary": gross_salary, "rate": rate.to_string()}),
            gross * rate,
            format!("{} of gross salary", rate),
        )
    };
    let health_insurance = deduction("DED-HEALTH", "Health Insurance", rates.health_insurance);
    let pension_insurance = deduction("DED-PENSION", "Pension Insurance", rates.pension_insurance);
    let employment_insurance =
        deduction("DED-EMPLOYMENT", "Employment Insurance", rates.employment_insurance);
    let income_tax = deduction("DED-INCOME-TAX", "Income Tax", rates.income_tax);
    let resident_tax = deduction("DED-RESIDENT-TAX", "Resident Tax", rates.resident_tax);

    let total_deduction =
        health_insurance + pension_insurance + employment_insurance + income_tax + resident_tax;
    let net_salary = gross_salary - total_deduction;
    audit.record(
        "PAY-NET",
        "Net Salary",
        json!({"gross_salary": gross_salary, "total_deduction": total_deduction}),
        json!({"net_salary": net_salary}),
        "Gross salary less total deductions".to_string(),
    );

    let record = PayrollRecord {
        payroll_id: format!("PAY{}{:02}_{:04}", hours.year, hours.month, sequence),
        year: hours.year,
        month: hours.month,
        staff_id,
        staff_name: hours.staff_name.clone(),
        work_days: hours.days_worked,
        work_hours: one_decimal(hours.total_hours),
        base_salary,
        overtime_pay,
        commute_allowance,
        other_allowances,
        gross_salary,
        health_insurance,
        pension_insurance,
        employment_insurance,
        income_tax,
        resident_tax,
        total_deduction,
        net_salary,
        payment_date: payment_date(hours.year, hours.month, config.payment_day),
        payment_status: PAYMENT_STATUS_PAID.to_string(),
        notes: String::new(),
    };

    PayrollStatement {
        record,
        audit_steps: audit.steps,
    }
}

/// Aggregates `records` and prices every staff-month.
///
/// Payroll ids are numbered in aggregation order.
pub fn generate_payroll(
    records: &[WorkHoursRecord],
    config: &PayrollConfig,
    directory: &mut StaffDirectory,
) -> Vec<PayrollStatement> {
    aggregate_monthly_hours(records)
        .iter()
        .zip(1..)
        .map(|(hours, sequence)| {
            let staff_id = directory.lookup(&hours.staff_name);
            calculate_payroll(hours, config, staff_id, sequence)
        })
        .collect()
}

/// Truncates a yen amount toward zero.
///
/// Amounts beyond the `i64` range cannot come from validated rates; they
/// fall back to zero with a warning.
pub fn truncate_yen(amount: Decimal) -> i64 {
    amount.trunc().to_i64().unwrap_or_else(|| {
        warn!(amount = %amount, "Amount out of range, using 0");
        0
    })
}

fn one_decimal(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(1);
    rounded.rescale(1);
    rounded
}

/// Payment date in the payroll month, clamped to the month's last day.
fn payment_date(year: i32, month: u32, payment_day: u32) -> NaiveDate {
    let last_day = days_in_month(year, month).unwrap_or(28);
    let day = payment_day.clamp(1, last_day);
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[derive(Debug, Default)]
struct AuditLog {
    steps: Vec<AuditStep>,
}

impl AuditLog {
    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Truncates `amount`, records the step and returns the truncated value.
    fn line(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        amount: Decimal,
        reasoning: String,
    ) -> i64 {
        let truncated = truncate_yen(amount);
        self.record(
            rule_id,
            rule_name,
            input,
            json!({"exact": amount.normalize().to_string(), "amount": truncated}),
            reasoning,
        );
        truncated
    }
}
