//! Payroll estimate records and their audit trail.
//!
//! A [`PayrollRecord`] aggregates one staff member's simulated work hours for
//! one month. Every line item is truncated to whole yen on its own, and the
//! record carries the [`AuditStep`]s that produced each line.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single step in the audit trail of a payroll estimate.
///
/// Each step captures the input, output, and reasoning for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// Identifier of the line item rule (e.g. `PAY-BASE`).
    pub rule_id: String,
    /// Human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// Monthly payroll estimate for one staff member.
///
/// `net_salary = gross_salary - total_deduction`; both are non-negative
/// because every deduction is a fraction of gross and the configured
/// fractions sum to at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Identifier of the form `PAY<yyyymm>_<nnnn>`.
    pub payroll_id: String,
    /// Payroll year.
    pub year: i32,
    /// Payroll month.
    pub month: u32,
    /// Staff identifier from the staff directory, empty if unknown.
    pub staff_id: Option<String>,
    /// Normalized staff name.
    pub staff_name: String,
    /// Number of shifts worked in the month.
    pub work_days: u32,
    /// Total actual hours, one decimal.
    pub work_hours: rust_decimal::Decimal,
    /// Hours × hourly rate, truncated.
    pub base_salary: i64,
    /// Overtime hours × rate × multiplier, truncated.
    pub overtime_pay: i64,
    /// Work days × per-day commute allowance.
    pub commute_allowance: i64,
    /// Flat other allowances.
    pub other_allowances: i64,
    /// Sum of the four pay lines above.
    pub gross_salary: i64,
    /// Health insurance deduction.
    pub health_insurance: i64,
    /// Pension insurance deduction.
    pub pension_insurance: i64,
    /// Employment insurance deduction.
    pub employment_insurance: i64,
    /// Income tax withholding.
    pub income_tax: i64,
    /// Resident tax withholding.
    pub resident_tax: i64,
    /// Sum of the five deductions.
    pub total_deduction: i64,
    /// Gross minus deductions.
    pub net_salary: i64,
    /// Payment date within the payroll month.
    pub payment_date: NaiveDate,
    /// Payment status, always `PAID` for generated data.
    pub payment_status: String,
    /// Free-form notes.
    pub notes: String,
}

impl PayrollRecord {
    /// Returns true if the record satisfies `net = gross - deductions` with
    /// non-negative totals.
    pub fn is_balanced(&self) -> bool {
        let deductions = self.health_insurance
            + self.pension_insurance
            + self.employment_insurance
            + self.income_tax
            + self.resident_tax;
        deductions == self.total_deduction
            && self.net_salary == self.gross_salary - self.total_deduction
            && self.net_salary >= 0
            && self.total_deduction >= 0
    }
}

/// A payroll record together with the audit steps that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollStatement {
    /// The payroll record as exported.
    pub record: PayrollRecord,
    /// One step per line item, in calculation order.
    pub audit_steps: Vec<AuditStep>,
}
